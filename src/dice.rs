// Dice pools: generation, classification, summaries and the push reroll.
use rand::Rng; // RNG utilities from the rand crate for generating face values.
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

pub const SUCCESS_FACE: u8 = 6;
pub const FAILURE_FACE: u8 = 1;

// The three die categories. Which faces succeed, fail, break gear or may be
// pushed depends only on the category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DieColor {
    Green,  // Critical dice: attributes, rot resistance, rot damage.
    Yellow, // Hazard dice: skills.
    Black,  // Equipment dice: gear bonus, rot suit.
}

impl DieColor {
    pub fn is_success(self, value: u8) -> bool {
        value == SUCCESS_FACE
    }

    pub fn is_failure(self, value: u8) -> bool {
        matches!(self, DieColor::Yellow | DieColor::Black) && value == FAILURE_FACE
    }

    pub fn is_broken_gear(self, value: u8) -> bool {
        self == DieColor::Black && value == FAILURE_FACE
    }

    // Whether a face may be rerolled, ignoring the die's pushed flag.
    fn is_rerollable(self, value: u8) -> bool {
        match self {
            DieColor::Green => value != SUCCESS_FACE,
            DieColor::Yellow | DieColor::Black => (2..=5).contains(&value),
        }
    }
}

// A single die as it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    pub id: Uuid,         // Unique within a roll.
    pub value: u8,        // Face, 1 to 6.
    pub color: DieColor,  // Category the die was requested under.
    #[serde(default)]
    pub pushed: bool,     // Set on dice produced by a push.
}

impl DieResult {
    pub fn new(color: DieColor, value: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            color,
            pushed: false,
        }
    }

    // Roll a fresh die of the given color.
    pub fn roll(color: DieColor, faces: &mut impl FaceSource) -> Self {
        Self::new(color, faces.roll_face())
    }

    pub fn is_success(&self) -> bool {
        self.color.is_success(self.value)
    }

    pub fn is_failure(&self) -> bool {
        self.color.is_failure(self.value)
    }

    pub fn is_broken_gear(&self) -> bool {
        self.color.is_broken_gear(self.value)
    }

    // A die may be pushed once, and only when its face is not locked.
    pub fn is_pushable(&self) -> bool {
        !self.pushed && self.color.is_rerollable(self.value)
    }

    // Face as shown on the physical dice.
    pub fn glyph(&self) -> String {
        match (self.value, self.color) {
            (SUCCESS_FACE, _) => "☢️".to_string(),
            (FAILURE_FACE, DieColor::Black) => "💥".to_string(),
            (FAILURE_FACE, DieColor::Yellow) => "☣️".to_string(),
            (value, _) => value.to_string(),
        }
    }
}

// Number of dice requested per color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceConfig {
    pub green: u32,
    pub yellow: u32,
    pub black: u32,
}

impl DiceConfig {
    pub fn new(green: u32, yellow: u32, black: u32) -> Self {
        Self {
            green,
            yellow,
            black,
        }
    }

    pub fn count(&self, color: DieColor) -> u32 {
        match color {
            DieColor::Green => self.green,
            DieColor::Yellow => self.yellow,
            DieColor::Black => self.black,
        }
    }

    pub fn set_count(&mut self, color: DieColor, count: u32) {
        match color {
            DieColor::Green => self.green = count,
            DieColor::Yellow => self.yellow = count,
            DieColor::Black => self.black = count,
        }
    }

    pub fn total(&self) -> u32 {
        self.green
            .saturating_add(self.yellow)
            .saturating_add(self.black)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// Totals derived from a set of dice. Never stored on its own: recompute it
// with `summarize` whenever the dice change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollSummary {
    pub success_count: u32,
    pub failure_count: u32,
    pub broken_gear_count: u32, // Also included in failure_count.
}

// Source of face values for dice. Production code uses RngFaces, tests
// hand in a SequenceFaces to get exact, repeatable outcomes.
pub trait FaceSource {
    // Returns a face in 1..=6.
    fn roll_face(&mut self) -> u8;
}

// Uniform faces drawn from a rand RNG.
#[derive(Debug, Clone)]
pub struct RngFaces<R> {
    rng: R,
}

impl<R: Rng> RngFaces<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RngFaces<ThreadRng> {
    fn default() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> FaceSource for RngFaces<R> {
    fn roll_face(&mut self) -> u8 {
        self.rng.random_range(1..=6)
    }
}

// Replays a fixed list of faces, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct SequenceFaces {
    faces: VecDeque<u8>,
}

impl SequenceFaces {
    // Faces outside 1..=6 are clamped into range.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().map(|face| face.clamp(1, 6)).collect(),
        }
    }
}

impl FaceSource for SequenceFaces {
    fn roll_face(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => {
                self.faces.push_back(face);
                face
            }
            None => FAILURE_FACE,
        }
    }
}

// Roll every die in the pool, green first, then yellow, then black.
pub fn roll_pool(config: &DiceConfig, faces: &mut impl FaceSource) -> Vec<DieResult> {
    let mut results = Vec::with_capacity(config.total() as usize);
    for color in DieColor::iter() {
        for _ in 0..config.count(color) {
            results.push(DieResult::roll(color, faces));
        }
    }
    results
}

pub fn summarize(results: &[DieResult]) -> RollSummary {
    results
        .iter()
        .fold(RollSummary::default(), |mut summary, die| {
            if die.is_success() {
                summary.success_count += 1;
            }
            if die.is_failure() {
                summary.failure_count += 1;
            }
            if die.is_broken_gear() {
                summary.broken_gear_count += 1;
            }
            summary
        })
}

pub fn any_pushable(results: &[DieResult]) -> bool {
    results.iter().any(DieResult::is_pushable)
}

// Reroll every pushable die and keep the others as they are. Rerolled dice
// come back marked as pushed, so nothing in the output can be pushed again.
// With nothing pushable the input is returned unchanged.
pub fn push_pool(results: &[DieResult], faces: &mut impl FaceSource) -> Vec<DieResult> {
    results
        .iter()
        .map(|die| {
            if die.is_pushable() {
                DieResult {
                    pushed: true,
                    ..DieResult::roll(die.color, faces)
                }
            } else {
                die.clone()
            }
        })
        .collect()
}
