pub mod character;
pub mod dice;
pub mod error;
pub mod history;
pub mod logging;
pub mod roller;
pub mod rot;
pub mod settings;
pub mod skills;
pub mod storage;

// Re-export commonly used items for easier access
pub use character::{Attribute, BaseSkill, CharacterSheet, Role, RotSuit};
pub use dice::{
    DiceConfig, DieColor, DieResult, FaceSource, RngFaces, RollSummary, SequenceFaces,
    any_pushable, push_pool, roll_pool, summarize,
};
pub use error::{AppError, DiceError, StorageError};
pub use history::{HistoryBook, HistoryEntry, RollHistory};
pub use roller::{DiceRoller, MAX_POOL_DICE};
pub use rot::{ProtectionRollRecord, RotConfig, RotOutcome, RotPhase, RotWorkflow};
pub use settings::Settings;
pub use storage::{FileStorage, MemoryStorage, Storage};
