//! Dice kinds, random sources, pools, and rolling.
//!
//! Every die in the system is a d6. Plain dice are rolled once; dragon
//! dice explode openly, rolling again and adding on every 6.

pub mod pool;
pub mod roll;

pub use pool::{DicePool, build_pool};
pub use roll::{DieResult, RollOutcome, evaluate};

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Number of faces on every die in the system.
pub const D6_FACES: u32 = 6;

/// Which rule a die follows when rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DieKind {
    /// An ordinary pool die.
    Plain,
    /// An exploding dragon die, labelled by its position among the dragon dice.
    Dragon {
        /// 1-based display index.
        index: u32,
        /// How many dragon dice the pool holds.
        of: u32,
    },
}

impl DieKind {
    /// Returns true for dice that explode on a 6.
    pub fn explodes(self) -> bool {
        matches!(self, Self::Dragon { .. })
    }
}

impl std::fmt::Display for DieKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "d6"),
            // A lone dragon die carries no index.
            Self::Dragon { of: 1, .. } => write!(f, "Dragon Die"),
            Self::Dragon { index, .. } => write!(f, "Dragon Die {index}"),
        }
    }
}

/// A source of die faces.
///
/// Injected into every resolution so callers control entropy. A source that
/// cannot produce a face fails with [`EngineError::ResolutionUnavailable`].
pub trait RandomSource {
    /// Draw one uniform face in `1..=sides`.
    fn draw(&mut self, sides: u32) -> EngineResult<u32>;
}

impl RandomSource for StdRng {
    fn draw(&mut self, sides: u32) -> EngineResult<u32> {
        if sides == 0 {
            return Err(EngineError::ResolutionUnavailable);
        }
        Ok(self.random_range(1..=sides))
    }
}

/// A random source that replays a fixed sequence of faces.
///
/// Used for replays and deterministic tests. Once the sequence runs dry,
/// every further draw fails.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    faces: VecDeque<u32>,
}

impl ScriptedSource {
    /// Create a source that yields `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// How many faces are left to draw.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl RandomSource for ScriptedSource {
    fn draw(&mut self, sides: u32) -> EngineResult<u32> {
        match self.faces.pop_front() {
            Some(face) if (1..=sides).contains(&face) => Ok(face),
            _ => Err(EngineError::ResolutionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn dragon_labels() {
        assert_eq!(DieKind::Dragon { index: 1, of: 1 }.to_string(), "Dragon Die");
        assert_eq!(DieKind::Dragon { index: 2, of: 3 }.to_string(), "Dragon Die 2");
        assert_eq!(DieKind::Plain.to_string(), "d6");
    }

    #[test]
    fn only_dragon_dice_explode() {
        assert!(DieKind::Dragon { index: 1, of: 1 }.explodes());
        assert!(!DieKind::Plain.explodes());
    }

    #[test]
    fn scripted_source_replays_then_runs_dry() {
        let mut source = ScriptedSource::new([3, 6]);
        assert_eq!(source.draw(D6_FACES).unwrap(), 3);
        assert_eq!(source.draw(D6_FACES).unwrap(), 6);
        assert_eq!(source.remaining(), 0);
        assert!(matches!(
            source.draw(D6_FACES),
            Err(EngineError::ResolutionUnavailable)
        ));
    }

    #[test]
    fn scripted_source_rejects_impossible_face() {
        let mut source = ScriptedSource::new([7]);
        assert!(source.draw(D6_FACES).is_err());
    }

    #[test]
    fn std_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let face = rng.draw(D6_FACES).unwrap();
            assert!((1..=6).contains(&face));
        }
    }
}
