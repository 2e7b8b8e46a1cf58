use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("digit cell at 0x{address:04X} holds {value}, expected 0-9")]
    Decode { address: u16, value: u8 },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("stuck in {phase} after {frames} frames")]
    StuckState { phase: &'static str, frames: u32 },

    #[error("episode is over, call reset() before stepping")]
    NeedsReset,

    #[error(transparent)]
    Core(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EnvError>;
