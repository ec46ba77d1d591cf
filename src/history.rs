use crate::dice::{DieColor, DieResult, FAILURE_FACE, RollSummary, SUCCESS_FACE, summarize};
use crate::error::StorageError;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

pub const HISTORY_CAPACITY: usize = 10;
pub const PUSH_SUFFIX: &str = " (Push)";

// Well known stream keys. Any other key is a stream of its own.
pub const SKILL_STREAM: &str = "skill";
pub const ROT_PROTECTION_STREAM: &str = "rot-protection";
pub const ROT_DAMAGE_STREAM: &str = "rot-damage";

// One completed roll or push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub results: Vec<DieResult>,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(results: Vec<DieResult>, description: impl Into<String>) -> Self {
        Self {
            results,
            description: description.into(),
            recorded_at: Utc::now(),
        }
    }

    // Entry for a push of the roll described by `description`.
    pub fn push(results: Vec<DieResult>, description: &str) -> Self {
        Self::new(results, format!("{}{}", description, PUSH_SUFFIX))
    }

    pub fn is_push(&self) -> bool {
        self.results.iter().any(|die| die.pushed)
    }

    pub fn summary(&self) -> RollSummary {
        summarize(&self.results)
    }

    // Broken gear is only worth showing when equipment dice were rolled.
    pub fn has_equipment_dice(&self) -> bool {
        self.results.iter().any(|die| die.color == DieColor::Black)
    }
}

// Bounded log of rolls, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollHistory {
    entries: Vec<HistoryEntry>,
}

impl RollHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // Newest entry goes first; anything past the capacity is dropped.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// History sink that writes every stream through to a `Storage`.
#[derive(Debug, Clone)]
pub struct HistoryBook<S: Storage> {
    storage: S,
}

impl<S: Storage> HistoryBook<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn key(stream: &str) -> String {
        format!("history_{}", stream)
    }

    // Missing, unreadable or corrupted history loads as an empty log.
    pub fn load(&self, stream: &str) -> RollHistory {
        let raw = match self.storage.get(&Self::key(stream)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RollHistory::new(),
            Err(e) => {
                warn!("Could not read history for '{}': {}", stream, e);
                return RollHistory::new();
            }
        };

        match serde_json::from_str::<RollHistory>(&raw) {
            Ok(mut history) => {
                let before = history.entries.len();
                history.entries.retain(|entry| {
                    entry
                        .results
                        .iter()
                        .all(|die| (FAILURE_FACE..=SUCCESS_FACE).contains(&die.value))
                });
                if history.entries.len() < before {
                    warn!(
                        "Dropped {} history entries with impossible faces for '{}'",
                        before - history.entries.len(),
                        stream
                    );
                }
                history.entries.truncate(HISTORY_CAPACITY);
                history
            }
            Err(e) => {
                warn!("Discarding malformed history for '{}': {}", stream, e);
                RollHistory::new()
            }
        }
    }

    pub fn save(&mut self, stream: &str, history: &RollHistory) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(history)?;
        self.storage.set(&Self::key(stream), &serialized)
    }

    pub fn record(&mut self, stream: &str, entry: HistoryEntry) -> Result<(), StorageError> {
        let mut history = self.load(stream);
        history.record(entry);
        self.save(stream, &history)
    }

    pub fn clear(&mut self, stream: &str) -> Result<(), StorageError> {
        self.storage.remove(&Self::key(stream))
    }

    pub fn list(&self, stream: &str) -> Vec<HistoryEntry> {
        self.load(stream).entries
    }
}
