//! Rules engine: rulesets, tests, and results.
//!
//! A [`Ruleset`] carries the policy switches the engine consults. It can be
//! read from JSON via [`Ruleset::from_json`], or taken from the presets in
//! [`preset`].

pub mod preset;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{DicePool, RandomSource, RollOutcome, build_pool};
use crate::error::{EngineError, EngineResult};
use crate::sheet::{Attribute, CharacterSheet, SkillKey};

/// How a fractional average is turned into an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round to nearest, halves up.
    #[default]
    HalfUp,
    /// Round down.
    Floor,
}

impl Rounding {
    /// Divide `numerator` by a positive `denominator` under this rounding.
    pub fn divide(self, numerator: i32, denominator: i32) -> i32 {
        let (n, d) = (i64::from(numerator), i64::from(denominator));
        let quotient = match self {
            Self::HalfUp => (2 * n + d).div_euclid(2 * d),
            Self::Floor => n.div_euclid(d),
        };
        i32::try_from(quotient).unwrap_or(if quotient < 0 { i32::MIN } else { i32::MAX })
    }
}

/// The policy switches of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Ruleset name.
    pub name: String,
    /// Player-character subtypes that get full health. `None` means all of them.
    pub health_subtypes: Option<Vec<String>>,
    /// Flat maximum health for everyone else.
    pub npc_health: i32,
    /// Rounding applied to the initiative average.
    pub initiative_rounding: Rounding,
    /// Initiative scores above this roll 2d6 instead of 1d6.
    pub initiative_threshold: i32,
    /// The skill added to passive defence.
    pub defence_skill: SkillKey,
    /// Whether a pure attribute test adds maximum heroism to the pool.
    pub attribute_test_heroism: bool,
}

impl Default for Ruleset {
    fn default() -> Self {
        preset::standard()
    }
}

impl Ruleset {
    /// Parse a ruleset from JSON. Missing fields take the standard values.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Read a ruleset from a JSON file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Returns true if a player character of this subtype gets full health.
    pub fn grants_full_health(&self, subtype: Option<&str>) -> bool {
        match &self.health_subtypes {
            None => true,
            Some(subtypes) => subtype
                .is_some_and(|s| subtypes.iter().any(|t| t.eq_ignore_ascii_case(s.trim()))),
        }
    }
}

/// A request to test an attribute, optionally combined with a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRequest {
    /// The attribute being tested.
    pub attribute: Attribute,
    /// The skill added to the attribute, if any.
    pub skill: Option<SkillKey>,
}

impl TestRequest {
    /// A pure attribute test.
    pub fn attribute(attribute: Attribute) -> Self {
        Self {
            attribute,
            skill: None,
        }
    }

    /// An attribute + skill test.
    pub fn skill(attribute: Attribute, skill: SkillKey) -> Self {
        Self {
            attribute,
            skill: Some(skill),
        }
    }
}

/// What kind of test was rolled, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    /// No skill was involved.
    AttributeTest,
    /// A skill test where the character has no ranks in the skill.
    Unskilled,
    /// A skill test with at least one rank.
    Skilled,
}

impl std::fmt::Display for TestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AttributeTest => write!(f, "attribute test"),
            Self::Unskilled => write!(f, "unskilled"),
            Self::Skilled => write!(f, "skilled"),
        }
    }
}

/// The result of performing a test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// The attribute tested.
    pub attribute: Attribute,
    /// The skill used, if any.
    pub skill: Option<SkillKey>,
    /// The pool that was rolled.
    pub pool: DicePool,
    /// The roll.
    pub outcome: RollOutcome,
    /// How the test is labelled.
    pub category: TestCategory,
}

impl TestResult {
    /// Returns true if the pool was empty and the test fails outright.
    pub fn is_auto_fail(&self) -> bool {
        self.pool.is_empty()
    }
}

/// Build the pool for a test request and roll it.
pub fn perform_test<R: RandomSource + ?Sized>(
    ruleset: &Ruleset,
    sheet: &CharacterSheet,
    request: &TestRequest,
    rng: &mut R,
) -> EngineResult<TestResult> {
    let attribute = sheet.attribute(request.attribute);

    let (bonus, category) = match &request.skill {
        Some(key) => {
            let value = sheet.skill(key);
            let category = if value == 0 {
                TestCategory::Unskilled
            } else {
                TestCategory::Skilled
            };
            (value, category)
        }
        None if ruleset.attribute_test_heroism => {
            (sheet.virtues.heroism.max, TestCategory::AttributeTest)
        }
        None => (0, TestCategory::AttributeTest),
    };

    let pool = build_pool(attribute, sheet.dragon_dice, bonus)?;
    let outcome = pool.roll(rng)?;
    debug!(character = %sheet.name, %category, total = outcome.total, "performed test");

    Ok(TestResult {
        attribute: request.attribute,
        skill: request.skill.clone(),
        pool,
        outcome,
        category,
    })
}
