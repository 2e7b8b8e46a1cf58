use crate::error::{EnvError, Result};

// =============================================================================
// Reward Tuning Knobs
// =============================================================================

/// Defaults reproduce the reference reward exactly.
#[derive(Debug, Clone)]
pub struct RewardConfig {
    /// Paid when the horizontal position did not change this step.
    pub stagnation_penalty: i64,
    pub time_out_penalty: i64,
    pub time_tick_reward: i64,
    pub death_penalty: i64,
    pub flag_bonus: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            stagnation_penalty: -10,
            time_out_penalty: -5_000,
            time_tick_reward: 5,
            death_penalty: -5_000,
            flag_bonus: 1_000_000,
        }
    }
}

// =============================================================================
// Environment Constants
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RomVariant {
    #[default]
    Original,
    LostLevels,
}

/// A single stage the environment is pinned to. One-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub world: u8,
    pub stage: u8,
    pub area: u8,
}

impl Target {
    pub fn new(world: u8, stage: u8, area: u8) -> Result<Self> {
        if !(1..=8).contains(&world) {
            return Err(EnvError::Configuration(format!(
                "world must be in 1..=8, got {world}"
            )));
        }
        if !(1..=4).contains(&stage) {
            return Err(EnvError::Configuration(format!(
                "stage must be in 1..=4, got {stage}"
            )));
        }
        if !(1..=5).contains(&area) {
            return Err(EnvError::Configuration(format!(
                "area must be in 1..=5, got {area}"
            )));
        }
        Ok(Self { world, stage, area })
    }

    /// Resolve the area for `world-stage`. Stages that open with a pipe
    /// intro have an extra area in front of them.
    pub fn from_world_stage(world: u8, stage: u8, variant: RomVariant) -> Result<Self> {
        check_variant(world, variant)?;
        let intro_worlds: &[u8] = match variant {
            RomVariant::Original => &[1, 2, 4, 7],
            RomVariant::LostLevels => &[1, 3],
        };
        let area = if intro_worlds.contains(&world) && stage >= 2 {
            stage + 1
        } else {
            stage
        };
        Self::new(world, stage, area)
    }
}

fn check_variant(world: u8, variant: RomVariant) -> Result<()> {
    if variant == RomVariant::LostLevels && world >= 5 {
        return Err(EnvError::Configuration(format!(
            "lost levels world {world} is not supported as a target"
        )));
    }
    Ok(())
}

pub struct EnvConfig {
    pub rom_variant: RomVariant,
    pub target: Option<Target>,
    /// Ceiling on forced frames in any single skip loop.
    pub max_skip_frames: u32,
    pub reward: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            rom_variant: RomVariant::Original,
            target: None,
            max_skip_frames: 10_000,
            reward: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_skip_frames == 0 {
            return Err(EnvError::Configuration(
                "max_skip_frames must be positive".to_string(),
            ));
        }
        if let Some(t) = self.target {
            // Re-check fields in case the target was built by hand.
            Target::new(t.world, t.stage, t.area)?;
            check_variant(t.world, self.rom_variant)?;
        }
        Ok(())
    }
}
