//! Character snapshots: attributes, virtues, skills, and dragon dice.
//!
//! A sheet is the flat numeric snapshot the engine works from. It is read
//! from JSON supplied by whatever owns the character; the engine never
//! persists it on its own.

pub mod heroism;

pub use heroism::{Heroism, HeroismNotice, heroism_max};

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};

/// One of the five base attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Strength and bodily might.
    Physical,
    /// Speed and dexterity.
    Agility,
    /// Constitution and toughness.
    Fortitude,
    /// Intellect.
    Reasoning,
    /// Presence and charm.
    Social,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Self; 5] = [
        Self::Physical,
        Self::Agility,
        Self::Fortitude,
        Self::Reasoning,
        Self::Social,
    ];

    /// The attribute's key, as used in sheets and test requests.
    pub fn key(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Agility => "agility",
            Self::Fortitude => "fortitude",
            Self::Reasoning => "reasoning",
            Self::Social => "social",
        }
    }

    /// Parse a key or its three-letter alias (`str`, `dex`, `con`, `int`, `cha`).
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "physical" | "str" => Some(Self::Physical),
            "agility" | "dex" => Some(Self::Agility),
            "fortitude" | "con" => Some(Self::Fortitude),
            "reasoning" | "int" => Some(Self::Reasoning),
            "social" | "cha" => Some(Self::Social),
            _ => None,
        }
    }
}

impl FromStr for Attribute {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| EngineError::UnknownAttribute(s.to_string()))
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The five attribute scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSet {
    /// Physical score.
    #[serde(alias = "str")]
    pub physical: i32,
    /// Agility score.
    #[serde(alias = "dex")]
    pub agility: i32,
    /// Fortitude score.
    #[serde(alias = "con")]
    pub fortitude: i32,
    /// Reasoning score.
    #[serde(alias = "int")]
    pub reasoning: i32,
    /// Social score.
    #[serde(alias = "cha")]
    pub social: i32,
}

impl AttributeSet {
    /// Get a single attribute score.
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Physical => self.physical,
            Attribute::Agility => self.agility,
            Attribute::Fortitude => self.fortitude,
            Attribute::Reasoning => self.reasoning,
            Attribute::Social => self.social,
        }
    }
}

/// The three base virtues and the heroism pool they bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtueSet {
    /// Bravery score.
    pub bravery: i32,
    /// Faith score.
    pub faith: i32,
    /// Loyalty score.
    pub loyalty: i32,
    /// Current and maximum heroism.
    pub heroism: Heroism,
}

impl VirtueSet {
    /// Recompute heroism from the virtues and refill it. Returns the new pool.
    ///
    /// Negative virtues are rejected and leave heroism untouched.
    pub fn reset_heroism(&mut self) -> EngineResult<Heroism> {
        for (name, value) in [
            ("bravery", self.bravery),
            ("faith", self.faith),
            ("loyalty", self.loyalty),
        ] {
            if value < 0 {
                return Err(EngineError::InvalidSheet(format!(
                    "virtue '{name}' is negative ({value})"
                )));
            }
        }
        self.heroism = Heroism::from_virtues(self.bravery, self.faith, self.loyalty);
        Ok(self.heroism)
    }
}

/// A skill, identified by the figure it belongs to and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillKey {
    /// The archetype grouping the skill (e.g. "adventurer").
    pub figure: String,
    /// The skill name (e.g. "athletics").
    pub skill: String,
}

impl SkillKey {
    /// Create a skill key.
    pub fn new(figure: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            figure: figure.into(),
            skill: skill.into(),
        }
    }
}

impl FromStr for SkillKey {
    type Err = EngineError;

    /// Parse `figure/skill` or `figure.skill`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (figure, skill) = s
            .split_once(['/', '.'])
            .filter(|(f, k)| !f.trim().is_empty() && !k.trim().is_empty())
            .ok_or_else(|| {
                EngineError::InvalidSheet(format!("skill '{s}' is not of the form figure/skill"))
            })?;
        Ok(Self::new(figure.trim().to_lowercase(), skill.trim().to_lowercase()))
    }
}

impl std::fmt::Display for SkillKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.figure, self.skill)
    }
}

/// Whether a character is played by a player or run by the game master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// A player character.
    #[default]
    #[serde(alias = "pc")]
    PlayerCharacter,
    /// A non-player character.
    #[serde(alias = "npc")]
    NonPlayerCharacter,
}

impl std::fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayerCharacter => write!(f, "player character"),
            Self::NonPlayerCharacter => write!(f, "npc"),
        }
    }
}

/// Skill values grouped by figure, then skill name.
pub type SkillTable = BTreeMap<String, BTreeMap<String, i32>>;

/// A character's numeric snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Character name.
    pub name: String,
    /// Player or non-player character.
    #[serde(default)]
    pub kind: CharacterKind,
    /// Optional subtype tag (e.g. "Dragon-marked").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Attribute scores.
    #[serde(default)]
    pub attributes: AttributeSet,
    /// Virtues and heroism.
    #[serde(default)]
    pub virtues: VirtueSet,
    /// Skill values by figure and skill.
    #[serde(default)]
    pub skills: SkillTable,
    /// Dragon dice allocated to tests.
    #[serde(default)]
    pub dragon_dice: i32,
    /// Soak granted by worn armour.
    #[serde(default)]
    pub armor_soak: i32,
    /// Challenge rating (non-player characters).
    #[serde(default)]
    pub challenge_rating: i32,
}

impl CharacterSheet {
    /// Create a blank sheet of the given kind.
    pub fn new(name: impl Into<String>, kind: CharacterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Parse a sheet from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidSheet(e.to_string()))
    }

    /// Read a sheet from a JSON file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidSheet(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Serialize the sheet as pretty-printed JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::InvalidSheet(e.to_string()))
    }

    /// Get an attribute score.
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(attribute)
    }

    /// Get a skill value, returning 0 if the character lacks it (untrained).
    pub fn skill(&self, key: &SkillKey) -> i32 {
        self.skills
            .get(&key.figure)
            .and_then(|skills| skills.get(&key.skill))
            .copied()
            .unwrap_or(0)
    }

    /// Set a skill value.
    pub fn set_skill(&mut self, key: &SkillKey, value: i32) {
        self.skills
            .entry(key.figure.clone())
            .or_default()
            .insert(key.skill.clone(), value);
    }

    /// Every skill on the sheet with its value.
    pub fn skill_entries(&self) -> impl Iterator<Item = (SkillKey, i32)> + '_ {
        self.skills.iter().flat_map(|(figure, skills)| {
            skills
                .iter()
                .map(move |(skill, value)| (SkillKey::new(figure.as_str(), skill.as_str()), *value))
        })
    }

    /// Recompute heroism from the virtues, refill it, and report the change.
    pub fn reset_heroism(&mut self) -> EngineResult<HeroismNotice> {
        let previous = self.virtues.heroism;
        let heroism = self.virtues.reset_heroism().inspect_err(|e| {
            warn!(character = %self.name, error = %e, "heroism reset rejected");
        })?;
        info!(character = %self.name, value = heroism.value, max = heroism.max, "heroism reset");
        Ok(HeroismNotice {
            character: self.name.clone(),
            previous,
            heroism,
        })
    }
}
