//! Error types.

use cricket_rules::BallNumber;
use thiserror::Error;

/// Out-of-contract input. The accumulator refuses the event and leaves its state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("ball {got} does not follow {previous}")]
    OutOfOrder { previous: BallNumber, got: BallNumber },

    #[error("event belongs to innings {got}, accumulator tracks innings {expected}")]
    InningsMismatch { expected: u32, got: u32 },

    #[error("ball {ball}: total runs {total} != bat runs {batter} + extras {extras}")]
    InconsistentRuns {
        ball: BallNumber,
        total: u32,
        batter: u32,
        extras: u32,
    },

    #[error("ball {0}: ball numbers within an over start at 1")]
    InvalidBall(BallNumber),

    #[error("ball {0}: a wide cannot carry runs off the bat")]
    WideWithBatRuns(BallNumber),

    #[error("ball {0}: extras recorded without an extras kind")]
    ExtrasWithoutKind(BallNumber),

    #[error("no event at index {index}, innings has {len} events")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure of an optional external collaborator. Never surfaces from the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("lookup timed out after {0} ms")]
    Timeout(u64),

    #[error("lookup unavailable: {0}")]
    Unavailable(String),

    #[error("lookup still busy with an earlier call")]
    Busy,

    #[error("lookup worker disconnected")]
    Disconnected,
}

/// Invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub type Result<T, E = ContextError> = std::result::Result<T, E>;
