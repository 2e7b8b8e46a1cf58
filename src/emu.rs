use anyhow::{Context, Result};
use std::path::Path;
use tetanes_core::cpu::Cpu;
use tetanes_core::input::JoypadBtnState;
use tetanes_core::mem::{Read, Write};
use tetanes_core::prelude::*;

/// Controller bitmask bits, one byte per frame.
pub mod buttons {
    pub const NOOP: u8 = 0x00;
    pub const A: u8 = 0x01;
    pub const B: u8 = 0x02;
    pub const SELECT: u8 = 0x04;
    pub const START: u8 = 0x08;
    pub const UP: u8 = 0x10;
    pub const DOWN: u8 = 0x20;
    pub const LEFT: u8 = 0x40;
    pub const RIGHT: u8 = 0x80;
}

/// The emulation core the environment drives. It owns CPU/PPU simulation;
/// the environment only peeks and pokes RAM, advances frames and swaps
/// whole-machine snapshots.
pub trait EmulatorCore {
    type Snapshot: Clone;

    fn peek(&self, addr: u16) -> u8;
    fn poke(&mut self, addr: u16, val: u8);

    /// Hold `buttons` for exactly one frame.
    fn advance_frame(&mut self, buttons: u8) -> Result<()>;

    /// Power-cycle the machine.
    fn reset(&mut self);

    fn snapshot(&self) -> Self::Snapshot;
    fn restore(&mut self, snapshot: &Self::Snapshot);
}

// =============================================================================
// tetanes backend
// =============================================================================

pub struct TetanesCore {
    deck: ControlDeck,
}

impl TetanesCore {
    pub fn load(rom_path: &Path) -> Result<Self> {
        let mut deck = ControlDeck::new();
        deck.set_headless_mode(
            tetanes_core::control_deck::HeadlessMode::NO_AUDIO
                | tetanes_core::control_deck::HeadlessMode::NO_VIDEO,
        );
        deck.load_rom_path(rom_path)
            .with_context(|| format!("Failed to load ROM: {}", rom_path.display()))?;
        Ok(Self { deck })
    }

    fn set_input(&mut self, mask: u8) {
        let joypad = self.deck.joypad_mut(Player::One);
        for (bit, button) in [
            (buttons::A, JoypadBtnState::A),
            (buttons::B, JoypadBtnState::B),
            (buttons::SELECT, JoypadBtnState::SELECT),
            (buttons::START, JoypadBtnState::START),
            (buttons::UP, JoypadBtnState::UP),
            (buttons::DOWN, JoypadBtnState::DOWN),
            (buttons::LEFT, JoypadBtnState::LEFT),
            (buttons::RIGHT, JoypadBtnState::RIGHT),
        ] {
            joypad.set_button(button, mask & bit != 0);
        }
    }
}

impl EmulatorCore for TetanesCore {
    type Snapshot = Cpu;

    fn peek(&self, addr: u16) -> u8 {
        self.deck.bus().peek(addr)
    }

    fn poke(&mut self, addr: u16, val: u8) {
        self.deck.bus_mut().write(addr, val);
    }

    fn advance_frame(&mut self, buttons: u8) -> Result<()> {
        self.set_input(buttons);
        self.deck.clock_frame()?;
        Ok(())
    }

    fn reset(&mut self) {
        self.deck.reset(ResetKind::Hard);
    }

    fn snapshot(&self) -> Cpu {
        self.deck.cpu().clone()
    }

    fn restore(&mut self, snapshot: &Cpu) {
        self.deck.load_cpu(snapshot.clone());
    }
}

// =============================================================================
// Scripted core for tests
// =============================================================================
