use crate::config::RewardConfig;
use crate::decode::GameState;

/// Range `StepResult::reward` is clipped to.
pub const REWARD_RANGE: (f32, f32) = (-15.0, 15.0);

/// What the previous step left behind. Threaded through each step instead
/// of living on the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepContext {
    pub x_position_last: i32,
    pub time_last: u32,
}

impl StepContext {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            x_position_last: state.x_position,
            time_last: state.time,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardBreakdown {
    pub x: i64,
    pub death: i64,
    pub time: i64,
    pub flag: i64,
}

impl RewardBreakdown {
    pub fn total(&self) -> i64 {
        self.x + self.death + self.time + self.flag
    }
}

pub struct RewardSynthesizer {
    config: RewardConfig,
}

impl RewardSynthesizer {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    /// Score the state reached this step. Returns the context for the next
    /// step alongside the reward.
    pub fn compute(&self, ctx: StepContext, state: &GameState) -> (StepContext, RewardBreakdown) {
        let rc = &self.config;

        // Standing still is penalised; distance covered earns nothing.
        let x = if state.x_position == ctx.x_position_last {
            rc.stagnation_penalty
        } else {
            0
        };

        // Any running clock pays the tick reward regardless of how far it
        // moved since the last step.
        let time = if state.time == 0 {
            rc.time_out_penalty
        } else {
            rc.time_tick_reward
        };

        let death = if state.is_dying() || state.is_dead() {
            rc.death_penalty
        } else {
            0
        };

        let flag = if state.flag_get() { rc.flag_bonus } else { 0 };

        (
            StepContext::from_state(state),
            RewardBreakdown {
                x,
                death,
                time,
                flag,
            },
        )
    }
}

pub fn clip_reward(raw: i64) -> f32 {
    (raw as f32).clamp(REWARD_RANGE.0, REWARD_RANGE.1)
}
