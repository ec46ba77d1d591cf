// Import necessary modules from external crates.
use crate::dice::DiceConfig;
use crate::error::StorageError;
use crate::rot::{MAX_SUIT_RATING, MIN_SUIT_RATING, RotConfig};
use crate::skills::SkillInfo;
use crate::storage::Storage;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const CHARACTER_KEY: &str = "character";
pub const MAX_POINTS: u8 = 10;
pub const DEFAULT_ATTRIBUTE: u8 = 4;
pub const ROT_RESISTANT_TALENT: &str = "Rot Resistant";

// Character roles, each with exactly one specialist skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString)]
pub enum Role {
    Enforcer,
    Gearhead,
    Stalker,
    Fixer,
    #[strum(serialize = "Dog Handler")]
    DogHandler,
    Chronicler,
    Boss,
    Grunt,
}

impl Role {
    // Catalog id of the role's specialist skill.
    pub fn specialist_skill_id(self) -> &'static str {
        match self {
            Role::Enforcer => "enforcer-intimidate",
            Role::Gearhead => "gearhead-jury-rig",
            Role::Stalker => "stalker-find-the-path",
            Role::Fixer => "fixer-make-a-deal",
            Role::DogHandler => "dog-handler-sic-a-dog",
            Role::Chronicler => "chronicler-inspire",
            Role::Boss => "boss-command",
            Role::Grunt => "grunt-shake-it-off",
        }
    }

    pub fn specialist_skill_name(self) -> &'static str {
        match self {
            Role::Enforcer => "Intimidate",
            Role::Gearhead => "Jury Rig",
            Role::Stalker => "Find the Path",
            Role::Fixer => "Make a Deal",
            Role::DogHandler => "Sic a Dog",
            Role::Chronicler => "Inspire",
            Role::Boss => "Command",
            Role::Grunt => "Shake It Off",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Attribute {
    Strength,
    Agility,
    Wits,
    Empathy,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum BaseSkill {
    Endure,
    Force,
    Fight,
    Sneak,
    Move,
    Shoot,
    Scout,
    Comprehend,
    #[strum(serialize = "Know the Zone")]
    KnowTheZone,
    #[strum(serialize = "Sense Emotion")]
    SenseEmotion,
    Manipulate,
    Heal,
}

impl BaseSkill {
    pub fn attribute(self) -> Attribute {
        match self {
            BaseSkill::Endure | BaseSkill::Force | BaseSkill::Fight => Attribute::Strength,
            BaseSkill::Sneak | BaseSkill::Move | BaseSkill::Shoot => Attribute::Agility,
            BaseSkill::Scout | BaseSkill::Comprehend | BaseSkill::KnowTheZone => Attribute::Wits,
            BaseSkill::SenseEmotion | BaseSkill::Manipulate | BaseSkill::Heal => {
                Attribute::Empathy
            }
        }
    }
}

// Attribute rating and the trauma currently suffered against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeScore {
    pub value: u8,
    pub trauma: u8,
}

impl Default for AttributeScore {
    fn default() -> Self {
        Self {
            value: DEFAULT_ATTRIBUTE,
            trauma: 0,
        }
    }
}

impl AttributeScore {
    // Trauma removes dice from the pool.
    pub fn dice(&self) -> u32 {
        u32::from(self.value.saturating_sub(self.trauma))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: AttributeScore,
    pub agility: AttributeScore,
    pub wits: AttributeScore,
    pub empathy: AttributeScore,
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> &AttributeScore {
        match attribute {
            Attribute::Strength => &self.strength,
            Attribute::Agility => &self.agility,
            Attribute::Wits => &self.wits,
            Attribute::Empathy => &self.empathy,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut AttributeScore {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Agility => &mut self.agility,
            Attribute::Wits => &mut self.wits,
            Attribute::Empathy => &mut self.empathy,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub face: String,
    pub body: String,
    pub clothing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearItem {
    pub name: String,
    pub weight: u32,
    #[serde(default)]
    pub tiny: bool, // Tiny items do not count toward encumbrance.
}

impl GearItem {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight: weight.max(1),
            tiny: false,
        }
    }

    pub fn tiny(name: impl Into<String>) -> Self {
        Self {
            tiny: true,
            ..Self::new(name, 1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Range {
    #[strum(serialize = "Arm's Length")]
    ArmsLength,
    Near,
    Short,
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub bonus: u8,
    pub damage: u8,
    pub range: Range,
    pub weight: u32,
    #[serde(default)]
    pub special: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ArmorKind {
    Damage,
    Rot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub rating: u8,
    pub kind: ArmorKind,
    pub weight: u32,
    #[serde(default)]
    pub worn: bool, // Worn armor weighs nothing.
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotSuit {
    pub name: String,
    pub rating: u8,
}

impl RotSuit {
    pub fn new(name: impl Into<String>, rating: u8) -> Self {
        Self {
            name: name.into(),
            rating: rating.clamp(MIN_SUIT_RATING, MAX_SUIT_RATING),
        }
    }
}

// Define a structure representing a character's sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSheet {
    // Personal Information
    pub name: String,
    pub role: Role,
    pub appearance: Appearance,

    // Attributes and Skills
    pub attributes: Attributes,
    pub skills: BTreeMap<BaseSkill, u8>,
    pub specialist_skill: u8, // Rating of the role's specialist skill.

    // Points, each 0 to MAX_POINTS.
    pub rot_points: u8,
    pub experience_points: u8,
    pub mutation_points: u8,

    // Equipment
    pub gear: Vec<GearItem>,
    pub weapons: Vec<Weapon>,
    pub armor: Vec<Armor>,
    pub rot_suit: Option<RotSuit>,

    // Special Abilities
    pub talents: Vec<String>,
    pub mutations: Vec<String>,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: Role::Enforcer,
            appearance: Appearance::default(),
            attributes: Attributes::default(),
            skills: BaseSkill::iter().map(|skill| (skill, 0)).collect(),
            specialist_skill: 1,
            rot_points: 0,
            experience_points: 0,
            mutation_points: 0,
            gear: Vec::new(),
            weapons: Vec::new(),
            armor: Vec::new(),
            rot_suit: None,
            talents: Vec::new(),
            mutations: Vec::new(),
        }
    }
}

impl CharacterSheet {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            ..Self::default()
        }
    }

    // A missing or corrupted sheet loads as a blank one.
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get(CHARACTER_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding malformed character sheet: {}", e);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Could not read character sheet: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut impl Storage) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(self)?;
        storage.set(CHARACTER_KEY, &serialized)
    }

    pub fn skill(&self, skill: BaseSkill) -> u8 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }

    pub fn set_skill(&mut self, skill: BaseSkill, value: u8) {
        self.skills.insert(skill, value);
    }

    pub fn set_rot_points(&mut self, value: u8) {
        self.rot_points = value.min(MAX_POINTS);
    }

    pub fn set_experience_points(&mut self, value: u8) {
        self.experience_points = value.min(MAX_POINTS);
    }

    pub fn set_mutation_points(&mut self, value: u8) {
        self.mutation_points = value.min(MAX_POINTS);
    }

    pub fn has_talent(&self, talent: &str) -> bool {
        self.talents.iter().any(|t| t.eq_ignore_ascii_case(talent))
    }

    // Attribute dice in green, skill dice in yellow, gear bonus in black.
    pub fn base_skill_pool(&self, skill: BaseSkill, gear_bonus: u32) -> DiceConfig {
        DiceConfig::new(
            self.attributes.get(skill.attribute()).dice(),
            u32::from(self.skill(skill)),
            gear_bonus,
        )
    }

    // Pool for a catalog skill. None for another role's specialist skill or
    // a skill the sheet does not track.
    pub fn pool_for(&self, info: &SkillInfo, gear_bonus: u32) -> Option<DiceConfig> {
        if info.specialist {
            if info.id != self.role.specialist_skill_id() {
                return None;
            }
            return Some(DiceConfig::new(
                self.attributes.get(info.attribute).dice(),
                u32::from(self.specialist_skill),
                gear_bonus,
            ));
        }
        let skill = BaseSkill::from_str(info.name).ok()?;
        Some(self.base_skill_pool(skill, gear_bonus))
    }

    pub fn carried_weight(&self) -> u32 {
        let gear: u32 = self
            .gear
            .iter()
            .filter(|item| !item.tiny)
            .map(|item| item.weight)
            .sum();
        let weapons: u32 = self.weapons.iter().map(|weapon| weapon.weight).sum();
        let armor: u32 = self
            .armor
            .iter()
            .filter(|item| !item.worn)
            .map(|item| item.weight)
            .sum();
        gear + weapons + armor
    }

    pub fn max_carry_weight(&self) -> u32 {
        u32::from(self.attributes.strength.value) * 2
    }

    pub fn is_encumbered(&self) -> bool {
        self.carried_weight() > self.max_carry_weight()
    }

    // Rot exposure for the sheet's current rot points and suit. A sheet
    // without rot points has nothing to resolve.
    pub fn rot_config(&self, resistant_dice: u32) -> Option<RotConfig> {
        if self.rot_points == 0 {
            return None;
        }
        Some(
            RotConfig::new(u32::from(self.rot_points))
                .resistant(self.has_talent(ROT_RESISTANT_TALENT))
                .resistant_dice(resistant_dice)
                .suit(self.rot_suit.as_ref().map(|suit| suit.rating)),
        )
    }
}
