use tracing::{debug, trace, warn};

use crate::config::Target;
use crate::decode::{GameState, read_time};
use crate::emu::{EmulatorCore, buttons};
use crate::error::{EnvError, Result};
use crate::progress::PlayerState;
use crate::ram;

/// Counts forced frames inside one skip loop and trips once the ceiling is
/// passed.
struct FrameBudget {
    phase: &'static str,
    used: u32,
    max: u32,
}

impl FrameBudget {
    fn new(phase: &'static str, max: u32) -> Self {
        Self { phase, used: 0, max }
    }

    fn spend(&mut self, frames: u32) -> Result<()> {
        self.used = self.used.saturating_add(frames);
        if self.used > self.max {
            warn!(phase = self.phase, frames = self.used, "skip loop hit its frame ceiling");
            return Err(EnvError::StuckState {
                phase: self.phase,
                frames: self.used,
            });
        }
        trace!(phase = self.phase, frames = self.used, "forced frame");
        Ok(())
    }
}

/// Drives the core through frames the agent should never see: the title
/// screen, end-of-world cutscenes, area transitions, death animations.
/// Every procedure blocks until its condition clears.
#[derive(Debug, Clone)]
pub struct FrameSkipController {
    target: Option<Target>,
    max_frames: u32,
}

impl FrameSkipController {
    pub fn new(target: Option<Target>, max_frames: u32) -> Self {
        Self { target, max_frames }
    }

    pub fn is_single_stage(&self) -> bool {
        self.target.is_some()
    }

    /// Overwrite the stage registers so the next stage load lands on the
    /// target.
    pub fn write_stage<C: EmulatorCore>(&self, core: &mut C) {
        if let Some(t) = self.target {
            core.poke(ram::WORLD, t.world - 1);
            core.poke(ram::STAGE, t.stage - 1);
            core.poke(ram::AREA, t.area - 1);
        }
    }

    pub fn runout_prelevel_timer<C: EmulatorCore>(core: &mut C) {
        core.poke(ram::PRELEVEL_TIMER, 0);
    }

    fn press_start<C: EmulatorCore>(core: &mut C) -> Result<()> {
        core.advance_frame(buttons::START)?;
        core.advance_frame(buttons::NOOP)?;
        Ok(())
    }

    /// Press and release start until the clock runs, then keep tapping
    /// until the clock has ticked once so the intro frames are gone.
    pub fn skip_start_screen<C: EmulatorCore>(&self, core: &mut C) -> Result<()> {
        let mut budget = FrameBudget::new("start screen", self.max_frames);
        Self::press_start(core)?;
        budget.spend(2)?;

        while read_time(core)? == 0 {
            budget.spend(2)?;
            core.advance_frame(buttons::START)?;
            self.write_stage(core);
            core.advance_frame(buttons::NOOP)?;
            Self::runout_prelevel_timer(core);
        }

        let mut time_last = read_time(core)?;
        while read_time(core)? >= time_last {
            time_last = read_time(core)?;
            budget.spend(2)?;
            Self::press_start(core)?;
        }
        debug!(frames = budget.used, time = time_last, "start screen skipped");
        Ok(())
    }

    /// Idle through the end-of-world cutscene until the clock changes.
    pub fn skip_end_of_world<C: EmulatorCore>(&self, core: &mut C) -> Result<()> {
        if !GameState::read(core)?.is_world_over() {
            return Ok(());
        }
        let mut budget = FrameBudget::new("end of world", self.max_frames);
        let time = read_time(core)?;
        while read_time(core)? == time {
            budget.spend(1)?;
            core.advance_frame(buttons::NOOP)?;
        }
        debug!(frames = budget.used, "end of world skipped");
        Ok(())
    }

    /// Resolve a running area-change timer on the next frame.
    pub fn skip_change_area<C: EmulatorCore>(core: &mut C) {
        let timer = core.peek(ram::CHANGE_AREA_TIMER);
        if timer > 1 && timer < 255 {
            core.poke(ram::CHANGE_AREA_TIMER, 1);
        }
    }

    /// Advance no-op frames while the player cannot act.
    pub fn skip_occupied_states<C: EmulatorCore>(&self, core: &mut C) -> Result<()> {
        let mut budget = FrameBudget::new("busy state", self.max_frames);
        loop {
            let state = GameState::read(core)?;
            if !(state.is_busy() || state.is_world_over()) {
                break;
            }
            budget.spend(1)?;
            Self::runout_prelevel_timer(core);
            core.advance_frame(buttons::NOOP)?;
        }
        if budget.used > 0 {
            debug!(frames = budget.used, "occupied state skipped");
        }
        Ok(())
    }

    /// Cut a death animation short.
    pub fn kill_player<C: EmulatorCore>(core: &mut C) -> Result<()> {
        core.poke(ram::PLAYER_STATE, PlayerState::Dead.to_byte());
        core.advance_frame(buttons::NOOP)?;
        Ok(())
    }

    /// Post-step sequence for an episode that is still running.
    pub fn after_step<C: EmulatorCore>(&self, core: &mut C, state: &GameState) -> Result<()> {
        if state.is_dying() {
            Self::kill_player(core)?;
        }
        if !self.is_single_stage() {
            self.skip_end_of_world(core)?;
        }
        Self::skip_change_area(core);
        self.skip_occupied_states(core)
    }
}
