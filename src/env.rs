use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::config::{EnvConfig, Target};
use crate::decode::GameState;
use crate::emu::{EmulatorCore, TetanesCore};
use crate::error::{EnvError, Result};
use crate::progress::Status;
use crate::reward::{RewardBreakdown, RewardSynthesizer, StepContext, clip_reward};
use crate::skip::FrameSkipController;
use crate::tiles::{TileGrid, build_grid};
use crate::{Features, STATE_DIM};

// =============================================================================
// Observation
// =============================================================================

/// What the agent sees after each step. Field names are the wire keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub coins: u32,
    pub flag_get: bool,
    pub life: u8,
    pub score: u32,
    pub stage: u8,
    pub status: Status,
    pub time: u32,
    pub world: u8,
    pub x_pos: i32,
    pub y_pos: i32,
    pub enemy: TileGrid,
    /// Unclipped reward of the step that produced this observation.
    pub reward: i64,
}

impl Observation {
    fn new(state: &GameState, enemy: TileGrid, reward: i64) -> Self {
        Self {
            coins: state.coins,
            flag_get: state.flag_get(),
            life: state.life,
            score: state.score,
            stage: state.stage(),
            status: state.status,
            time: state.time,
            world: state.world(),
            x_pos: state.x_position,
            y_pos: state.y_position(),
            enemy,
            reward,
        }
    }

    /// Tile grid flattened row-major.
    pub fn to_features(&self) -> Features {
        let mut f = [0f32; STATE_DIM];
        for (slot, tile) in f.iter_mut().zip(self.enemy.cells()) {
            *slot = tile as u8 as f32;
        }
        f
    }
}

pub struct StepResult {
    pub observation: Observation,
    /// Reward clipped to `REWARD_RANGE`.
    pub reward: f32,
    pub raw_reward: i64,
    pub breakdown: RewardBreakdown,
    pub done: bool,
}

// =============================================================================
// NES Environment
// =============================================================================

pub struct MarioEnv<C: EmulatorCore> {
    core: C,
    backup: C::Snapshot,
    skip: FrameSkipController,
    rewards: RewardSynthesizer,
    ctx: StepContext,
    target: Option<Target>,
    needs_reset: bool,
    steps: u64,
}

impl MarioEnv<TetanesCore> {
    pub fn from_rom(rom_path: &Path, config: EnvConfig) -> Result<Self> {
        config.validate()?;
        let core = TetanesCore::load(rom_path)?;
        Self::new(core, config)
    }
}

impl<C: EmulatorCore> MarioEnv<C> {
    /// Power on, get past the title screen and keep a snapshot of the first
    /// playable frame. Every `reset` returns to that snapshot.
    pub fn new(mut core: C, config: EnvConfig) -> Result<Self> {
        config.validate()?;
        let skip = FrameSkipController::new(config.target, config.max_skip_frames);

        core.reset();
        skip.skip_start_screen(&mut core)?;
        let backup = core.snapshot();
        debug!(stage = ?config.target, "backup state captured");

        Ok(Self {
            core,
            backup,
            skip,
            rewards: RewardSynthesizer::new(config.reward),
            ctx: StepContext::default(),
            target: config.target,
            needs_reset: true,
            steps: 0,
        })
    }

    pub fn is_single_stage(&self) -> bool {
        self.target.is_some()
    }

    pub fn reset(&mut self) -> Result<Observation> {
        self.ctx = StepContext::default();
        self.core.restore(&self.backup);
        let state = GameState::read(&self.core)?;
        self.ctx = StepContext::from_state(&state);
        self.needs_reset = false;
        self.steps = 0;
        debug!(x = state.x_position, time = state.time, "episode reset");
        Ok(self.observe(&state, 0))
    }

    /// Hold `buttons` for one frame, score the result, then skip whatever
    /// non-interactive frames follow.
    pub fn step(&mut self, buttons: u8) -> Result<StepResult> {
        if self.needs_reset {
            return Err(EnvError::NeedsReset);
        }
        // Stays set if anything below fails.
        self.needs_reset = true;
        self.steps += 1;

        self.core.advance_frame(buttons)?;
        let state = GameState::read(&self.core)?;

        let (ctx, breakdown) = self.rewards.compute(self.ctx, &state);
        self.ctx = ctx;
        let raw_reward = breakdown.total();
        let done = self.is_done(&state);
        let observation = self.observe(&state, raw_reward);

        if done {
            debug!(
                steps = self.steps,
                x = state.x_position,
                flag = state.flag_get(),
                "episode done"
            );
        } else {
            self.skip.after_step(&mut self.core, &state)?;
            self.needs_reset = false;
        }

        Ok(StepResult {
            observation,
            reward: clip_reward(raw_reward),
            raw_reward,
            breakdown,
            done,
        })
    }

    pub fn is_done(&self, state: &GameState) -> bool {
        if self.is_single_stage() {
            state.is_dying() || state.is_dead() || state.flag_get()
        } else {
            state.is_game_over()
        }
    }

    /// Decode the current RAM image.
    pub fn state(&self) -> Result<GameState> {
        GameState::read(&self.core)
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn observe(&self, state: &GameState, reward: i64) -> Observation {
        Observation::new(state, build_grid(&self.core, state), reward)
    }
}
