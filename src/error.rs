//! Error type shared by model construction, configuration, and the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid input for the task description: must not be empty")]
    EmptyDescription,

    #[error("Invalid input for the task's ETA ({0}): must be a positive integer value")]
    InvalidEta(u64),

    #[error("Invalid input for the given robot name: must not be empty")]
    EmptyName,

    #[error("Invalid input for the given robot type: {0:?}")]
    UnknownCategory(String),

    #[error("Invalid robot count {count}: must be between 1 and {max}")]
    RobotCountOutOfRange { count: usize, max: usize },

    #[error("Invalid time scale {0}: must be a finite, non-negative number")]
    InvalidTimeScale(f64),

    #[error("Invalid robot spec {0:?}: expected <type>:<name>")]
    InvalidRobotSpec(String),

    #[error("Failed to spawn robot thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
