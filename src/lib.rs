pub const STATE_DIM: usize = tiles::GRID_ROWS * tiles::GRID_COLUMNS;
pub type Features = [f32; STATE_DIM];

pub mod config;
pub mod decode;
pub mod emu;
pub mod env;
pub mod error;
pub mod progress;
pub mod ram;
pub mod reward;
pub mod rollout;
pub mod skip;
pub mod tiles;

pub use config::{EnvConfig, RewardConfig, RomVariant, Target};
pub use decode::{Enemy, GameState};
pub use emu::{EmulatorCore, TetanesCore, buttons};
pub use env::{MarioEnv, Observation, StepResult};
pub use error::{EnvError, Result};
pub use progress::{PlayerState, Status};
pub use reward::{REWARD_RANGE, RewardBreakdown, StepContext};
pub use rollout::{EpisodeSummary, RolloutStats, run_episodes};
pub use tiles::{Tile, TileGrid};
