// =============================================================================
// Super Mario Bros. NES environment CLI
// =============================================================================
// Build & Run:
//   cargo build --release
//   cargo run --release -- baseline --rom smb.nes --episodes 10
//   cargo run --release -- explore  --rom smb.nes --world 1 --stage 2 --every 30

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use std::path::PathBuf;

use smb_rl::{EnvConfig, MarioEnv, Observation, RomVariant, Target, TetanesCore, buttons};

// =============================================================================
// Environment setup
// =============================================================================

#[derive(Args)]
struct StageArgs {
    #[arg(long)]
    rom: PathBuf,
    /// Pin the environment to one stage. Omit to play the whole game.
    #[arg(long)]
    world: Option<u8>,
    #[arg(long, requires = "world")]
    stage: Option<u8>,
    /// Override the area derived from world and stage.
    #[arg(long, requires = "stage")]
    area: Option<u8>,
    #[arg(long, default_value_t = false)]
    lost_levels: bool,
}

impl StageArgs {
    fn config(&self) -> Result<EnvConfig> {
        let rom_variant = if self.lost_levels {
            RomVariant::LostLevels
        } else {
            RomVariant::Original
        };
        let target = match (self.world, self.stage, self.area) {
            (None, _, _) => None,
            (Some(world), stage, Some(area)) => {
                Some(Target::new(world, stage.unwrap_or(1), area)?)
            }
            (Some(world), stage, None) => Some(Target::from_world_stage(
                world,
                stage.unwrap_or(1),
                rom_variant,
            )?),
        };
        Ok(EnvConfig {
            rom_variant,
            target,
            ..Default::default()
        })
    }

    fn open(&self) -> Result<MarioEnv<TetanesCore>> {
        let config = self.config()?;
        let env = MarioEnv::from_rom(&self.rom, config)
            .with_context(|| format!("Failed to start environment for {}", self.rom.display()))?;
        Ok(env)
    }
}

// =============================================================================
// Random Baseline
// =============================================================================

fn baseline(args: &BaselineArgs) -> Result<()> {
    eprintln!("Running random agent baseline...");
    let mut env = args.env.open()?;
    let mut rng = rand::rng();

    let stats = smb_rl::run_episodes(
        &mut env,
        |_| rng.random::<u8>(),
        args.episodes,
        args.max_steps,
    )?;

    for (i, ep) in stats.episodes.iter().enumerate() {
        eprintln!(
            "Random ep {}: reward={}, steps={}, max_x={}, flag={}{}",
            i + 1,
            ep.reward,
            ep.steps,
            ep.max_x,
            ep.flag,
            if ep.done { "" } else { " (step limit)" },
        );
    }
    let max = stats
        .episodes
        .iter()
        .map(|e| e.reward)
        .max()
        .unwrap_or_default();
    eprintln!(
        "\nBaseline: mean={:.1}, max={max}, mean_max_x={:.1}, flags={}/{}",
        stats.avg_reward,
        stats.avg_max_x,
        stats.flags,
        stats.episodes.len(),
    );
    Ok(())
}

// =============================================================================
// State Explorer
// =============================================================================

fn print_observation(step: u64, obs: &Observation) {
    println!("--- Step {step} ---");
    println!(
        "  World {}-{}  x={} y={}  status={}  life={}",
        obs.world,
        obs.stage,
        obs.x_pos,
        obs.y_pos,
        obs.status.as_str(),
        obs.life,
    );
    println!(
        "  score={} time={} coins={} flag={} reward={}",
        obs.score, obs.time, obs.coins, obs.flag_get, obs.reward
    );
    print!("{}", obs.enemy);
}

fn explore(args: &ExploreArgs) -> Result<()> {
    let mut env = args.env.open()?;
    let every = args.every.max(1);
    let mut obs = env.reset()?;
    let mut step = 0u64;

    while step < args.max_steps {
        // Hold right; jump in short bursts.
        let jump = step % args.jump_period < args.jump_frames;
        let held = buttons::RIGHT | if jump { buttons::A } else { buttons::NOOP };

        let result = env.step(held)?;
        step += 1;
        obs = result.observation;

        if args.json {
            println!("{}", serde_json::to_string(&obs)?);
        } else if step % every == 0 || result.done {
            print_observation(step, &obs);
        }

        if result.done {
            eprintln!("Episode done after {step} steps (flag={})", obs.flag_get);
            obs = env.reset()?;
        }
    }

    if !args.json {
        print_observation(step, &obs);
    }
    Ok(())
}

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "smb-rl", about = "Super Mario Bros. NES RL environment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk right and print decoded state and the tile grid
    Explore(ExploreArgs),
    /// Run random agent baseline
    Baseline(BaselineArgs),
}

#[derive(Parser)]
struct ExploreArgs {
    #[command(flatten)]
    env: StageArgs,
    #[arg(long, default_value = "600")]
    max_steps: u64,
    /// Print every N steps.
    #[arg(long, default_value = "30")]
    every: u64,
    /// Emit one JSON observation per step instead.
    #[arg(long, default_value_t = false)]
    json: bool,
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u64).range(1..))]
    jump_period: u64,
    #[arg(long, default_value = "20")]
    jump_frames: u64,
}

#[derive(Parser)]
struct BaselineArgs {
    #[command(flatten)]
    env: StageArgs,
    #[arg(long, default_value = "10")]
    episodes: usize,
    #[arg(long, default_value = "10000")]
    max_steps: u64,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Explore(args) => explore(args),
        Commands::Baseline(args) => baseline(args),
    }
}
