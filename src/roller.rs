use crate::dice::{
    DiceConfig, DieColor, DieResult, FaceSource, RollSummary, any_pushable, push_pool, roll_pool,
    summarize,
};
use crate::error::DiceError;
use crate::history::{HistoryEntry, RollHistory};
use log::{debug, warn};

pub const MAX_POOL_DICE: u32 = 100;

// One dice tray: the pool being configured, the dice on the table and the
// tray's own history.
//
// roll and push compute final faces immediately and put the tray into its
// in-progress state. The front end calls settle once it has finished showing
// the roll. Nothing can be rolled or pushed in between.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    stream: String,            // History stream this tray records into.
    config: DiceConfig,        // Pool used by the next roll.
    results: Vec<DieResult>,   // Dice currently on the table.
    last_description: String,  // Description of the last roll, reused by a push.
    rolling: bool,             // Set between a roll/push and settle.
    history: RollHistory,
}

impl DiceRoller {
    pub fn new(stream: impl Into<String>) -> Self {
        Self::with_history(stream, RollHistory::new())
    }

    pub fn with_history(stream: impl Into<String>, history: RollHistory) -> Self {
        Self {
            stream: stream.into(),
            config: DiceConfig::default(),
            results: Vec::new(),
            last_description: String::new(),
            rolling: false,
            history,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn config(&self) -> &DiceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DiceConfig) {
        self.config = config;
    }

    pub fn set_count(&mut self, color: DieColor, count: u32) {
        self.config.set_count(color, count);
    }

    pub fn results(&self) -> &[DieResult] {
        &self.results
    }

    pub fn summary(&self) -> RollSummary {
        summarize(&self.results)
    }

    pub fn history(&self) -> &RollHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    pub fn can_push(&self) -> bool {
        !self.rolling && any_pushable(&self.results)
    }

    // Roll the configured pool. An empty description falls back to "Roll N".
    pub fn roll(
        &mut self,
        faces: &mut impl FaceSource,
        description: &str,
    ) -> Result<&[DieResult], DiceError> {
        if self.rolling {
            warn!("Roll on '{}' rejected: roll in progress", self.stream);
            return Err(DiceError::RollInProgress);
        }
        if self.config.is_empty() {
            return Err(DiceError::EmptyPool);
        }
        if self.config.total() > MAX_POOL_DICE {
            warn!(
                "Roll on '{}' rejected: {} dice exceeds the limit of {}",
                self.stream,
                self.config.total(),
                MAX_POOL_DICE
            );
            return Err(DiceError::PoolTooLarge(self.config.total()));
        }

        let description = match description.trim() {
            "" => format!("Roll {}", self.history.len() + 1),
            trimmed => trimmed.to_string(),
        };

        self.results = roll_pool(&self.config, faces);
        self.history
            .record(HistoryEntry::new(self.results.clone(), description.clone()));
        self.last_description = description;
        self.rolling = true;

        debug!(
            "Rolled {:?} on '{}': {:?}",
            self.config,
            self.stream,
            self.summary()
        );
        Ok(&self.results)
    }

    // Reroll every pushable die on the table. Only offered once per roll:
    // after a push nothing is pushable any more.
    pub fn push(&mut self, faces: &mut impl FaceSource) -> Result<&[DieResult], DiceError> {
        if self.rolling {
            warn!("Push on '{}' rejected: roll in progress", self.stream);
            return Err(DiceError::RollInProgress);
        }
        if !any_pushable(&self.results) {
            return Err(DiceError::NothingToPush);
        }

        self.results = push_pool(&self.results, faces);
        self.history
            .record(HistoryEntry::push(self.results.clone(), &self.last_description));
        self.rolling = true;

        debug!("Pushed on '{}': {:?}", self.stream, self.summary());
        Ok(&self.results)
    }

    // End the in-progress phase started by roll or push.
    pub fn settle(&mut self) -> RollSummary {
        self.rolling = false;
        self.summary()
    }
}
