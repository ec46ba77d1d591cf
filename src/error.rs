use thiserror::Error;

// Reasons a dice session refuses an action. The session is left untouched
// whenever one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("No dice in the pool")]
    EmptyPool, // Roll requested with every count at zero.

    #[error("A roll is already in progress")]
    RollInProgress, // Roll or push before the previous one settled.

    #[error("No die can be pushed")]
    NothingToPush, // Every die is locked at 1 or 6, or already pushed.

    #[error("Too many dice in the pool: {0}")]
    PoolTooLarge(u32),
}

// Errors raised by the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

// Top level errors for the terminal front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Dice error: {0}")]
    Dice(#[from] DiceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Logger error: {0}")]
    SetLogger(#[from] log::SetLoggerError),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),
}
