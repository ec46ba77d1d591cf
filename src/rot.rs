// Rot exposure: one protection roll per rot point, then a damage roll for
// whatever got through.
use crate::dice::{DiceConfig, RollSummary};
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const RESISTANT_DICE: u32 = 3;
pub const MIN_RESISTANT_DICE: u32 = 1;
pub const MIN_ROT_POINTS: u32 = 1;
pub const MIN_SUIT_RATING: u8 = 1;
pub const MAX_SUIT_RATING: u8 = 6;
pub const DEFAULT_SUIT_RATING: u8 = 3;

// What the character brings to a rot exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotConfig {
    pub rot_points: u32,         // Hazard points to resolve, at least 1.
    pub rot_resistant: bool,     // Talent granting green protection dice.
    pub resistant_dice: u32,     // Green dice granted by the talent, at least 1.
    pub suit_rating: Option<u8>, // Starting rating of a worn rot suit.
}

impl Default for RotConfig {
    fn default() -> Self {
        Self {
            rot_points: MIN_ROT_POINTS,
            rot_resistant: false,
            resistant_dice: RESISTANT_DICE,
            suit_rating: None,
        }
    }
}

impl RotConfig {
    pub fn new(rot_points: u32) -> Self {
        Self {
            rot_points: rot_points.max(MIN_ROT_POINTS),
            ..Self::default()
        }
    }

    pub fn resistant(mut self, rot_resistant: bool) -> Self {
        self.rot_resistant = rot_resistant;
        self
    }

    pub fn resistant_dice(mut self, dice: u32) -> Self {
        self.resistant_dice = dice.max(MIN_RESISTANT_DICE);
        self
    }

    pub fn suit(mut self, rating: Option<u8>) -> Self {
        self.suit_rating = rating.map(|r| r.clamp(MIN_SUIT_RATING, MAX_SUIT_RATING));
        self
    }

    // Free-text rot point input: blank or garbage becomes the minimum.
    pub fn parse_rot_points(raw: &str) -> u32 {
        raw.trim()
            .parse::<u32>()
            .unwrap_or(MIN_ROT_POINTS)
            .max(MIN_ROT_POINTS)
    }

    // Free-text suit rating input: garbage becomes the default rating.
    pub fn parse_suit_rating(raw: &str) -> u8 {
        raw.trim()
            .parse::<u8>()
            .unwrap_or(DEFAULT_SUIT_RATING)
            .clamp(MIN_SUIT_RATING, MAX_SUIT_RATING)
    }

    pub fn has_protection(&self) -> bool {
        self.rot_resistant || self.suit_rating.is_some_and(|rating| rating > 0)
    }
}

// Outcome of the protection roll for one rot point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionRollRecord {
    pub rot_point: u32, // 1-based.
    pub absorbed: bool,
    pub broken_gear: u32,
}

// Final result of an exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotOutcome {
    pub absorbed: u32,
    pub remaining: u32,
    pub damage: u32,
    pub suit_reduced: bool,
    pub new_suit_rating: Option<u8>, // Only set when the suit was reduced.
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotPhase {
    AwaitingProtectionRoll { rot_point: u32 },
    AwaitingDamageRoll,
    Complete(RotOutcome),
}

// State of one rot exposure. Every step consumes the state and returns the
// next one. Submitting a roll in the wrong phase is logged and leaves the
// state as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotWorkflow {
    config: RotConfig,
    phase: RotPhase,
    records: Vec<ProtectionRollRecord>,
    suit_rating: Option<u8>, // Current rating, only ever goes down.
}

impl RotWorkflow {
    pub fn new(config: RotConfig) -> Self {
        let phase = if config.has_protection() {
            RotPhase::AwaitingProtectionRoll { rot_point: 1 }
        } else {
            RotPhase::AwaitingDamageRoll
        };
        Self {
            config,
            phase,
            records: Vec::new(),
            suit_rating: config.suit_rating,
        }
    }

    pub fn config(&self) -> &RotConfig {
        &self.config
    }

    pub fn phase(&self) -> &RotPhase {
        &self.phase
    }

    pub fn records(&self) -> &[ProtectionRollRecord] {
        &self.records
    }

    pub fn suit_rating(&self) -> Option<u8> {
        self.suit_rating
    }

    pub fn outcome(&self) -> Option<&RotOutcome> {
        match &self.phase {
            RotPhase::Complete(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn total_absorbed(&self) -> u32 {
        self.records.iter().filter(|r| r.absorbed).count() as u32
    }

    pub fn total_broken_gear(&self) -> u32 {
        self.records.iter().map(|r| r.broken_gear).sum()
    }

    // Rot points not absorbed so far, including those never rolled for.
    pub fn remaining(&self) -> u32 {
        self.config.rot_points.saturating_sub(self.total_absorbed())
    }

    pub fn protection_effective(&self) -> bool {
        self.config.rot_resistant || self.suit_rating.is_some_and(|rating| rating > 0)
    }

    // Dice for the pending protection roll, if one is pending.
    pub fn protection_pool(&self) -> Option<DiceConfig> {
        match self.phase {
            RotPhase::AwaitingProtectionRoll { .. } => Some(DiceConfig::new(
                if self.config.rot_resistant {
                    self.config.resistant_dice.max(MIN_RESISTANT_DICE)
                } else {
                    0
                },
                0,
                self.suit_rating.map_or(0, u32::from),
            )),
            _ => None,
        }
    }

    // Dice for the pending damage roll, if one is pending.
    pub fn damage_pool(&self) -> Option<DiceConfig> {
        match self.phase {
            RotPhase::AwaitingDamageRoll => Some(DiceConfig::new(self.remaining(), 0, 0)),
            _ => None,
        }
    }

    pub fn submit_protection_roll(mut self, summary: &RollSummary) -> Self {
        let RotPhase::AwaitingProtectionRoll { rot_point } = self.phase else {
            warn!("Protection roll submitted in phase {:?}; ignored", self.phase);
            return self;
        };

        let record = ProtectionRollRecord {
            rot_point,
            absorbed: summary.success_count > 0,
            broken_gear: summary.broken_gear_count,
        };
        self.records.push(record);
        if let Some(rating) = self.suit_rating {
            let broken = u8::try_from(summary.broken_gear_count).unwrap_or(u8::MAX);
            self.suit_rating = Some(rating.saturating_sub(broken));
        }
        info!(
            "Rot point {}/{}: absorbed={}, broken gear={}, suit={:?}",
            rot_point, self.config.rot_points, record.absorbed, record.broken_gear, self.suit_rating
        );

        if rot_point < self.config.rot_points && self.protection_effective() {
            self.phase = RotPhase::AwaitingProtectionRoll {
                rot_point: rot_point + 1,
            };
            self
        } else {
            self.enter_damage_phase()
        }
    }

    pub fn submit_damage_roll(mut self, summary: &RollSummary) -> Self {
        if self.phase != RotPhase::AwaitingDamageRoll {
            warn!("Damage roll submitted in phase {:?}; ignored", self.phase);
            return self;
        }
        self.complete(summary.failure_count);
        self
    }

    pub fn reset(self) -> Self {
        Self::new(self.config)
    }

    // Records made under another configuration are never kept.
    pub fn reconfigure(self, config: RotConfig) -> Self {
        if config == self.config {
            self
        } else {
            info!("Rot configuration changed; restarting exposure");
            Self::new(config)
        }
    }

    // Nothing got through: no damage roll is needed.
    fn enter_damage_phase(mut self) -> Self {
        if self.remaining() == 0 {
            self.complete(0);
        } else {
            self.phase = RotPhase::AwaitingDamageRoll;
        }
        self
    }

    fn complete(&mut self, damage: u32) {
        let suit_reduced = match (self.config.suit_rating, self.suit_rating) {
            (Some(start), Some(now)) => now < start,
            _ => false,
        };
        let outcome = RotOutcome {
            absorbed: self.total_absorbed(),
            remaining: self.remaining(),
            damage,
            suit_reduced,
            new_suit_rating: if suit_reduced { self.suit_rating } else { None },
        };
        info!("Rot exposure complete: {:?}", outcome);
        self.phase = RotPhase::Complete(outcome);
    }
}
