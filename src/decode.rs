use crate::emu::EmulatorCore;
use crate::error::{EnvError, Result};
use crate::progress::{PlayerState, Status};
use crate::ram;

/// An active enemy in level coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

/// Everything the environment derives from one RAM image. Never cached
/// across frames: read a fresh one after every frame advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub time: u32,
    pub coins: u32,
    pub life: u8,
    /// Zero-based as stored; see `world()`, `stage()`, `area()`.
    pub world_index: u8,
    pub stage_index: u8,
    pub area_index: u8,
    pub x_position: i32,
    pub left_x_position: i32,
    pub y_pixel: u8,
    pub y_viewport: u8,
    pub player_state: PlayerState,
    pub status: Status,
    pub float_state: u8,
    pub gameplay_mode: u8,
    pub enemy_types: [u8; 5],
    pub enemies: Vec<Enemy>,
}

/// Decode a counter stored as one decimal digit per byte, most significant
/// digit first.
pub fn read_digits<C: EmulatorCore>(core: &C, addrs: &[u16]) -> Result<u32> {
    let mut value = 0u32;
    for &address in addrs {
        let digit = core.peek(address);
        if digit > 9 {
            return Err(EnvError::Decode {
                address,
                value: digit,
            });
        }
        value = value * 10 + digit as u32;
    }
    Ok(value)
}

pub fn read_time<C: EmulatorCore>(core: &C) -> Result<u32> {
    read_digits(core, &ram::TIME_DIGITS)
}

/// Horizontal position in the level: page * 0x100 + on-page x.
pub fn read_x_position<C: EmulatorCore>(core: &C) -> i32 {
    core.peek(ram::PLAYER_PAGE) as i32 * 0x100 + core.peek(ram::PLAYER_X) as i32
}

fn read_enemies<C: EmulatorCore>(core: &C) -> Vec<Enemy> {
    (0..ram::ENEMY_ACTIVE.len())
        .filter(|&slot| core.peek(ram::ENEMY_ACTIVE[slot]) != 0)
        .map(|slot| Enemy {
            x: core.peek(ram::ENEMY_PAGE[slot]) as i32 * 0x100
                + core.peek(ram::ENEMY_X[slot]) as i32,
            y: core.peek(ram::ENEMY_Y[slot]) as i32,
        })
        .collect()
}

impl GameState {
    pub fn read<C: EmulatorCore>(core: &C) -> Result<Self> {
        let mut enemy_types = [0u8; 5];
        for (slot, &addr) in ram::ENEMY_TYPE.iter().enumerate() {
            enemy_types[slot] = core.peek(addr);
        }
        Ok(Self {
            score: read_digits(core, &ram::SCORE_DIGITS)?,
            time: read_time(core)?,
            coins: read_digits(core, &ram::COIN_DIGITS)?,
            life: core.peek(ram::LIVES),
            world_index: core.peek(ram::WORLD),
            stage_index: core.peek(ram::STAGE),
            area_index: core.peek(ram::AREA),
            x_position: read_x_position(core),
            left_x_position: (core.peek(ram::PLAYER_X) as i32
                - core.peek(ram::SCREEN_LEFT_X) as i32)
                .rem_euclid(256),
            y_pixel: core.peek(ram::PLAYER_Y_PIXEL),
            y_viewport: core.peek(ram::PLAYER_Y_VIEWPORT),
            player_state: PlayerState::from_byte(core.peek(ram::PLAYER_STATE)),
            status: Status::from_byte(core.peek(ram::PLAYER_STATUS)),
            float_state: core.peek(ram::FLOAT_STATE),
            gameplay_mode: core.peek(ram::GAMEPLAY_MODE),
            enemy_types,
            enemies: read_enemies(core),
        })
    }

    pub fn world(&self) -> u8 {
        self.world_index.wrapping_add(1)
    }

    pub fn stage(&self) -> u8 {
        self.stage_index.wrapping_add(1)
    }

    pub fn area(&self) -> u8 {
        self.area_index.wrapping_add(1)
    }

    /// Linear level number, world * 4 + stage (both zero-based).
    pub fn level(&self) -> u32 {
        self.world_index as u32 * 4 + self.stage_index as u32
    }
}
