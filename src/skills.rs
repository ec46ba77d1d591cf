// Skill catalog with the stunts unlocked by extra successes.
use crate::character::Attribute;
use crate::dice::RollSummary;

// Successes needed before stunts are on the table.
pub const STUNT_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stunt {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub attribute: Attribute,
    pub description: &'static str,
    pub specialist: bool,
    pub stunts: &'static [Stunt],
}

impl SkillInfo {
    // Stunts the player may pick from after this roll, if any.
    pub fn available_stunts(&self, summary: &RollSummary) -> &'static [Stunt] {
        if summary.success_count >= STUNT_THRESHOLD {
            self.stunts
        } else {
            &[]
        }
    }
}

pub fn find_skill(id: &str) -> Option<&'static SkillInfo> {
    SKILLS.iter().find(|skill| skill.id == id)
}

pub fn base_skills() -> impl Iterator<Item = &'static SkillInfo> {
    SKILLS.iter().filter(|skill| !skill.specialist)
}

pub fn specialist_skills() -> impl Iterator<Item = &'static SkillInfo> {
    SKILLS.iter().filter(|skill| skill.specialist)
}

pub static SKILLS: &[SkillInfo] = &[
    SkillInfo {
        id: "endure",
        name: "Endure",
        attribute: Attribute::Strength,
        description: "Hold out through hunger, cold and exhaustion.",
        specialist: false,
        stunts: &[Stunt {
            id: "endure-1",
            name: "Help an Ally",
            description: "Each extra success carries one companion in the same situation along with you.",
        }],
    },
    SkillInfo {
        id: "force",
        name: "Force",
        attribute: Attribute::Strength,
        description: "Lift, shove or break heavy things.",
        specialist: false,
        stunts: &[
            Stunt {
                id: "force-1",
                name: "Push or Throw Object Forcefully",
                description: "A target within arm's length takes damage equal to the extra successes.",
            },
            Stunt {
                id: "force-2",
                name: "Find Hidden Passages",
                description: "Clearing the debris reveals a hidden passage or object.",
            },
        ],
    },
    SkillInfo {
        id: "fight",
        name: "Fight",
        attribute: Attribute::Strength,
        description: "Close combat, armed or bare-handed.",
        specialist: false,
        stunts: &[
            Stunt {
                id: "fight-1",
                name: "More Damage",
                description: "Inflict one more point of damage.",
            },
            Stunt {
                id: "fight-2",
                name: "Fatigue",
                description: "The opponent suffers one point of fatigue.",
            },
            Stunt {
                id: "fight-3",
                name: "Increase Initiative Score",
                description: "Swap initiative with the opponent for the next round.",
            },
            Stunt {
                id: "fight-4",
                name: "Affect Object on Opponent",
                description: "Knock away or grab an item the opponent holds.",
            },
            Stunt {
                id: "fight-5",
                name: "Shove",
                description: "Knock the opponent to the ground.",
            },
            Stunt {
                id: "fight-6",
                name: "Grapple",
                description: "Pin the opponent, who must break free before acting.",
            },
        ],
    },
    SkillInfo {
        id: "shoot",
        name: "Shoot",
        attribute: Attribute::Agility,
        description: "Ranged attacks with firearms, bows and thrown weapons.",
        specialist: false,
        stunts: &[
            Stunt {
                id: "shoot-1",
                name: "Quick Shot",
                description: "Gain a free fast action.",
            },
            Stunt {
                id: "shoot-2",
                name: "Precise Shot",
                description: "Inflict one more point of damage.",
            },
            Stunt {
                id: "shoot-3",
                name: "Ricochet",
                description: "Hit a second target close to the first.",
            },
        ],
    },
    SkillInfo {
        id: "scout",
        name: "Scout",
        attribute: Attribute::Wits,
        description: "Spot and identify things at a distance.",
        specialist: false,
        stunts: &[
            Stunt {
                id: "scout-1",
                name: "Spot Weakness",
                description: "Learn one weakness of what you are watching.",
            },
            Stunt {
                id: "scout-2",
                name: "Find Path",
                description: "Spot a safe way toward or around the target.",
            },
            Stunt {
                id: "scout-3",
                name: "Predict Movement",
                description: "Learn where the target is heading.",
            },
        ],
    },
    SkillInfo {
        id: "sneak",
        name: "Sneak",
        attribute: Attribute::Agility,
        description: "Move unseen and unheard.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "move",
        name: "Move",
        attribute: Attribute::Agility,
        description: "Run, climb, jump and keep your footing.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "comprehend",
        name: "Comprehend",
        attribute: Attribute::Wits,
        description: "Make sense of old world texts and machines.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "know-the-zone",
        name: "Know the Zone",
        attribute: Attribute::Wits,
        description: "Recognize the phenomena and creatures of the Zone.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "sense-emotion",
        name: "Sense Emotion",
        attribute: Attribute::Empathy,
        description: "Read what someone feels or intends.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "manipulate",
        name: "Manipulate",
        attribute: Attribute::Empathy,
        description: "Talk someone into doing what you want.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "heal",
        name: "Heal",
        attribute: Attribute::Empathy,
        description: "Tend wounds and bring the broken back on their feet.",
        specialist: false,
        stunts: &[],
    },
    SkillInfo {
        id: "enforcer-intimidate",
        name: "Enforcer: Intimidate",
        attribute: Attribute::Strength,
        description: "Bend someone to your will with a credible threat.",
        specialist: true,
        stunts: &[Stunt {
            id: "enforcer-intimidate-stunt-1",
            name: "Break Their Spirit",
            description: "The target suffers one point of doubt per extra success.",
        }],
    },
    SkillInfo {
        id: "gearhead-jury-rig",
        name: "Gearhead: Jury Rig",
        attribute: Attribute::Wits,
        description: "Build something useful out of scrap.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "gearhead-jury-rig-stunt-1",
                name: "Durable",
                description: "The device lasts beyond a single use.",
            },
            Stunt {
                id: "gearhead-jury-rig-stunt-2",
                name: "Increased Gear Bonus",
                description: "The device's gear bonus goes up by one.",
            },
            Stunt {
                id: "gearhead-jury-rig-stunt-3",
                name: "Increased Weapon Damage",
                description: "A jury-rigged weapon deals one more damage.",
            },
        ],
    },
    SkillInfo {
        id: "stalker-find-the-path",
        name: "Stalker: Find the Path",
        attribute: Attribute::Agility,
        description: "Lead the way through the Zone.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "stalker-find-the-path-stunt-1",
                name: "Find an Artifact",
                description: "Stumble upon an artifact along the way.",
            },
            Stunt {
                id: "stalker-find-the-path-stunt-2",
                name: "Assess Rot Level",
                description: "Learn the rot level of the sector ahead.",
            },
            Stunt {
                id: "stalker-find-the-path-stunt-3",
                name: "Rot-Free Path",
                description: "Find a path that avoids the rot.",
            },
        ],
    },
    SkillInfo {
        id: "fixer-make-a-deal",
        name: "Fixer: Make a Deal",
        attribute: Attribute::Empathy,
        description: "Trade to your advantage.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "fixer-make-a-deal-stunt-1",
                name: "Deals on the Side: Get Bullets",
                description: "Pocket one extra bullet.",
            },
            Stunt {
                id: "fixer-make-a-deal-stunt-2",
                name: "Deals on the Side: Get Grub",
                description: "Pocket one extra ration of grub.",
            },
        ],
    },
    SkillInfo {
        id: "dog-handler-sic-a-dog",
        name: "Dog Handler: Sic a Dog",
        attribute: Attribute::Agility,
        description: "Send your dog to attack or track.",
        specialist: true,
        stunts: &[Stunt {
            id: "dog-handler-sic-a-dog-stunt-1",
            name: "Tracking: Extra Questions",
            description: "Ask the GM one more question about the tracked prey.",
        }],
    },
    SkillInfo {
        id: "chronicler-inspire",
        name: "Chronicler: Inspire",
        attribute: Attribute::Empathy,
        description: "Stir others to action with words or song.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "chronicler-inspire-stunt-1",
                name: "Help: Modifications",
                description: "Give an ally one more bonus die.",
            },
            Stunt {
                id: "chronicler-inspire-stunt-2",
                name: "Hinder: Remove Successes",
                description: "Cancel one success of an opponent.",
            },
        ],
    },
    SkillInfo {
        id: "boss-command",
        name: "Boss: Command",
        attribute: Attribute::Wits,
        description: "Give orders your gang will follow.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "boss-command-stunt-1",
                name: "Racketeering: Bullets",
                description: "The gang brings in one extra bullet.",
            },
            Stunt {
                id: "boss-command-stunt-2",
                name: "Racketeering: Grub",
                description: "The gang brings in one extra ration of grub.",
            },
        ],
    },
    SkillInfo {
        id: "grunt-shake-it-off",
        name: "Grunt: Shake It Off",
        attribute: Attribute::Strength,
        description: "Ignore the pain and keep going.",
        specialist: true,
        stunts: &[
            Stunt {
                id: "grunt-shake-it-off-stunt-1",
                name: "Reduce Trauma",
                description: "Heal one more point of trauma.",
            },
            Stunt {
                id: "grunt-shake-it-off-stunt-2",
                name: "Rebel: Extra Modifications",
                description: "Gain one more bonus die on your next roll.",
            },
        ],
    },
];
