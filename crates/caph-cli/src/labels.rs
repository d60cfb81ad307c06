//! Display labels for attributes, figures, and skills.
//!
//! The engine works with keys only; this table is what the terminal shows.

use caph_engine::{Attribute, SkillKey};

/// A figure with its label and its four skills as `(key, label)` pairs.
pub struct Figure {
    pub key: &'static str,
    pub label: &'static str,
    pub skills: [(&'static str, &'static str); 4],
}

pub static FIGURES: [Figure; 8] = [
    Figure {
        key: "adventurer",
        label: "Adventurer",
        skills: [
            ("athletics", "Athletics"),
            ("riding", "Riding"),
            ("storytelling", "Storytelling"),
            ("survival", "Survival"),
        ],
    },
    Figure {
        key: "labourer",
        label: "Labourer",
        skills: [
            ("agriculture", "Agriculture"),
            ("craft", "Craft"),
            ("endurance", "Endurance"),
            ("solidarity", "Solidarity"),
        ],
    },
    Figure {
        key: "poet",
        label: "Poet",
        skills: [
            ("acting", "Acting"),
            ("music", "Music"),
            ("oratory", "Oratory"),
            ("poetry", "Poetry"),
        ],
    },
    Figure {
        key: "prince",
        label: "Prince",
        skills: [
            ("elegance", "Elegance"),
            ("flattery", "Flattery"),
            ("save_face", "Save Face"),
            ("bargaining", "Bargaining"),
        ],
    },
    Figure {
        key: "rogue",
        label: "Rogue",
        skills: [
            ("assassination", "Assassination"),
            ("intrusion", "Intrusion"),
            ("stealth", "Stealth"),
            ("thievery", "Thievery"),
        ],
    },
    Figure {
        key: "sage",
        label: "Sage",
        skills: [
            ("history-people", "History & Peoples"),
            ("instruction", "Instruction"),
            ("notice", "Notice"),
            ("science", "Science"),
        ],
    },
    Figure {
        key: "sorcerer",
        label: "Sorcerer",
        skills: [
            ("prayer", "Prayer"),
            ("sacred_word", "Sacred Word"),
            ("sacrifice", "Sacrifice"),
            ("willpower", "Willpower"),
        ],
    },
    Figure {
        key: "warrior",
        label: "Warrior",
        skills: [
            ("command", "Command"),
            ("fighting", "Fighting"),
            ("intimidate", "Intimidate"),
            ("training", "Training"),
        ],
    },
];

pub fn attribute(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::Physical => "Physical",
        Attribute::Agility => "Agility",
        Attribute::Fortitude => "Fortitude",
        Attribute::Reasoning => "Reasoning",
        Attribute::Social => "Social",
    }
}

fn figure(key: &str) -> Option<&'static Figure> {
    FIGURES.iter().find(|f| f.key == key)
}

/// The label of a known figure.
pub fn figure_label(key: &str) -> Option<&'static str> {
    figure(key).map(|f| f.label)
}

/// The label of a known skill, or `None` if the figure/skill pair is not in the table.
pub fn skill(key: &SkillKey) -> Option<&'static str> {
    figure(&key.figure)?
        .skills
        .iter()
        .find(|(k, _)| *k == key.skill)
        .map(|(_, label)| *label)
}

/// The skill's label, falling back to its raw key.
pub fn skill_or_key(key: &SkillKey) -> String {
    skill(key).map_or_else(|| key.skill.clone(), str::to_string)
}
