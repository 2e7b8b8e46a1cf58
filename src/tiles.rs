use serde::{Serialize, Serializer};
use std::fmt;

use crate::decode::GameState;
use crate::emu::EmulatorCore;
use crate::ram;

pub const GRID_ROWS: usize = 12;
pub const GRID_COLUMNS: usize = 15;

const TILE_SIZE: i32 = 16;
// Sampling window around the player, in screen pixels.
const ROW_RANGE: std::ops::Range<i32> = -4 * TILE_SIZE..8 * TILE_SIZE;
const COLUMN_RANGE: std::ops::Range<i32> = -7 * TILE_SIZE..8 * TILE_SIZE;

const SCREEN_CENTER_X: i32 = 112;
const SCREEN_TOP_Y: i32 = 96;
const STATUS_BAR_HEIGHT: i32 = 32;
// Background below this height is never reported as solid.
const FLOOR_Y: i32 = 0x1B0;
const HIT_BOX: i32 = 8;
const SPRITE_X_OFFSET: i32 = 108;
const ENEMY_Y_OFFSET: i32 = 90;
const PLAYER_Y_OFFSET: i32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Empty = 0,
    Solid = 1,
    Enemy = 2,
    Player = 3,
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Egocentric occupancy map, 12 rows x 15 columns, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TileGrid(pub [[Tile; GRID_COLUMNS]; GRID_ROWS]);

impl TileGrid {
    pub fn rows(&self) -> &[[Tile; GRID_COLUMNS]; GRID_ROWS] {
        &self.0
    }

    pub fn get(&self, row: usize, column: usize) -> Tile {
        self.0[row][column]
    }

    pub fn cells(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for tile in row {
                let c = match tile {
                    Tile::Empty => '.',
                    Tile::Solid => '#',
                    Tile::Enemy => 'E',
                    Tile::Player => 'M',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Whether the background collision buffer holds anything at the tile
/// `(box_x, box_y)` pixels away from the screen center.
fn background_at<C: EmulatorCore>(core: &C, state: &GameState, box_x: i32, box_y: i32) -> bool {
    let local_x = state.x_position - state.left_x_position + box_x + SCREEN_CENTER_X;
    let local_y = box_y + SCREEN_TOP_Y;
    let page = local_x.div_euclid(256).rem_euclid(2);
    let sub_x = local_x.rem_euclid(256) / TILE_SIZE;
    let sub_y = (local_y - STATUS_BAR_HEIGHT).div_euclid(TILE_SIZE);
    if sub_y < 0 || sub_y >= ram::TILE_PAGE_ROWS as i32 {
        return false;
    }
    let page_size = (ram::TILE_PAGE_ROWS * ram::TILE_PAGE_COLUMNS) as i32;
    let offset = page * page_size + sub_y * ram::TILE_PAGE_COLUMNS as i32 + sub_x;
    core.peek(ram::TILES + offset as u16) != 0
}

/// Project background, enemies and the player into the grid. Later writes
/// win: enemies over background, the player over everything.
pub fn build_grid<C: EmulatorCore>(core: &C, state: &GameState) -> TileGrid {
    let mut grid = TileGrid::default();
    let y_position = state.y_position();
    let player_visible = state.y_viewport == 1;

    for (row, box_y) in ROW_RANGE.step_by(TILE_SIZE as usize).enumerate() {
        for (column, box_x) in COLUMN_RANGE.step_by(TILE_SIZE as usize).enumerate() {
            let mut tile = Tile::Empty;
            if background_at(core, state, box_x, box_y) && y_position + box_y < FLOOR_Y {
                tile = Tile::Solid;
            }

            let cell_x = state.x_position + box_x - state.left_x_position + SPRITE_X_OFFSET;
            for enemy in &state.enemies {
                if (enemy.x - cell_x).abs() <= HIT_BOX
                    && (enemy.y - (ENEMY_Y_OFFSET + box_y)).abs() <= HIT_BOX
                {
                    tile = Tile::Enemy;
                }
            }

            if player_visible
                && (state.x_position - cell_x).abs() <= HIT_BOX
                && (state.y_pixel as i32 - (PLAYER_Y_OFFSET + box_y)).abs() <= HIT_BOX
            {
                tile = Tile::Player;
            }

            grid.0[row][column] = tile;
        }
    }
    grid
}
