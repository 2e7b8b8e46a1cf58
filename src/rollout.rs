use tracing::info;

use crate::emu::EmulatorCore;
use crate::env::{MarioEnv, Observation};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    pub reward: i64,
    pub steps: u64,
    pub max_x: i32,
    pub flag: bool,
    /// False when the step limit cut the episode off.
    pub done: bool,
}

pub struct RolloutStats {
    pub avg_reward: f64,
    pub avg_max_x: f64,
    pub flags: usize,
    pub episodes: Vec<EpisodeSummary>,
}

impl RolloutStats {
    fn from_episodes(episodes: Vec<EpisodeSummary>) -> Self {
        let denom = episodes.len().max(1) as f64;
        Self {
            avg_reward: episodes.iter().map(|e| e.reward as f64).sum::<f64>() / denom,
            avg_max_x: episodes.iter().map(|e| e.max_x as f64).sum::<f64>() / denom,
            flags: episodes.iter().filter(|e| e.flag).count(),
            episodes,
        }
    }
}

/// Play `episodes` episodes with `policy` choosing a button mask from the
/// latest observation.
pub fn run_episodes<C, P>(
    env: &mut MarioEnv<C>,
    mut policy: P,
    episodes: usize,
    max_steps: u64,
) -> Result<RolloutStats>
where
    C: EmulatorCore,
    P: FnMut(&Observation) -> u8,
{
    let mut summaries = Vec::with_capacity(episodes);

    for ep in 0..episodes {
        let mut obs = env.reset()?;
        let mut summary = EpisodeSummary {
            reward: 0,
            steps: 0,
            max_x: obs.x_pos,
            flag: false,
            done: false,
        };

        while summary.steps < max_steps {
            let result = env.step(policy(&obs))?;
            summary.reward += result.raw_reward;
            summary.steps += 1;
            summary.max_x = summary.max_x.max(result.observation.x_pos);
            summary.flag |= result.observation.flag_get;
            obs = result.observation;
            if result.done {
                summary.done = true;
                break;
            }
        }

        info!(
            episode = ep + 1,
            reward = summary.reward,
            steps = summary.steps,
            max_x = summary.max_x,
            flag = summary.flag,
            "episode finished"
        );
        summaries.push(summary);
    }

    Ok(RolloutStats::from_episodes(summaries))
}
