//! Dice pool construction.
//!
//! A pool is sized from an attribute, an optional skill, and the
//! character's dragon dice. Dragon dice replace plain dice one for one;
//! when they would eat the whole pool, only the dragon dice are rolled.

use tracing::{debug, warn};

use super::roll::{self, RollOutcome};
use super::{DieKind, RandomSource};
use crate::error::{EngineError, EngineResult};

/// The dice rolled for one test: plain dice plus exploding dragon dice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DicePool {
    /// Number of ordinary d6.
    pub plain: u32,
    /// Number of exploding dragon d6.
    pub dragon: u32,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` plain dice.
    pub fn add_plain(mut self, count: u32) -> Self {
        self.plain += count;
        self
    }

    /// Add `count` dragon dice.
    pub fn add_dragon(mut self, count: u32) -> Self {
        self.dragon += count;
        self
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> u32 {
        self.plain + self.dragon
    }

    /// Returns true if the pool has no dice. An empty pool is an automatic failure.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if the pool was reduced to its dragon dice.
    pub fn is_dragon_only(&self) -> bool {
        self.plain == 0 && self.dragon > 0
    }

    /// The dragon dice of the pool, labelled `1..=dragon`.
    pub fn dragon_dice(&self) -> impl Iterator<Item = DieKind> + use<> {
        let of = self.dragon;
        (1..=of).map(move |index| DieKind::Dragon { index, of })
    }

    /// Render the pool as dice notation, e.g. `3d6 + 1d6x[Dragon Die]`.
    pub fn formula(&self) -> String {
        let mut terms = Vec::new();
        if self.plain > 0 {
            terms.push(format!("{}d6", self.plain));
        }
        for die in self.dragon_dice() {
            terms.push(format!("1d6x[{die}]"));
        }
        if terms.is_empty() {
            "0".to_string()
        } else {
            terms.join(" + ")
        }
    }

    /// Roll every die in the pool.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> EngineResult<RollOutcome> {
        roll::evaluate(self, rng)
    }
}

impl std::fmt::Display for DicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formula())
    }
}

/// Build the pool for a test from an attribute, a dragon-die count, and a skill.
///
/// Pass a skill of `0` for a test that uses none. Negative inputs are
/// rejected: they indicate a corrupted character snapshot.
pub fn build_pool(attribute: i32, dragon: i32, skill: i32) -> EngineResult<DicePool> {
    for (name, value) in [("attribute", attribute), ("skill", skill), ("dragon dice", dragon)] {
        if value < 0 {
            warn!(name, value, "rejected pool request with negative input");
            return Err(EngineError::InvalidPoolRequest(format!(
                "{name} value {value} is negative"
            )));
        }
    }

    let dragon = dragon.unsigned_abs();
    let net = i64::from(attribute) + i64::from(skill) - i64::from(dragon);

    let pool = if net > 0 {
        let plain = u32::try_from(net).unwrap_or(u32::MAX);
        DicePool::new().add_plain(plain).add_dragon(dragon)
    } else {
        // The degraded total never sizes the pool: roll the dragon dice alone.
        DicePool::new().add_dragon(dragon)
    };

    debug!(attribute, skill, dragon, formula = %pool, "built dice pool");
    Ok(pool)
}
