//! The heroism resource.
//!
//! Heroism is bounded by the three base virtues. Its maximum is the
//! average of bravery, faith and loyalty, rounded down; a reset refills
//! the current value to that maximum.

use serde::{Deserialize, Serialize};

/// A character's heroism pool: a current value between 0 and its maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heroism {
    /// Current value.
    pub value: i32,
    /// Maximum value.
    pub max: i32,
}

impl Heroism {
    /// A full heroism pool computed from the three virtues.
    pub fn from_virtues(bravery: i32, faith: i32, loyalty: i32) -> Self {
        let max = heroism_max(bravery, faith, loyalty);
        Self { value: max, max }
    }

    /// Returns true if `0 <= value <= max`.
    pub fn in_bounds(&self) -> bool {
        (0..=self.max).contains(&self.value)
    }
}

impl std::fmt::Display for Heroism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Heroism: {}/{}", self.value, self.max)
    }
}

/// `floor((bravery + faith + loyalty) / 3)`.
pub fn heroism_max(bravery: i32, faith: i32, loyalty: i32) -> i32 {
    (bravery + faith + loyalty).div_euclid(3)
}

/// Emitted when a character's heroism is reset, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroismNotice {
    /// Name of the character whose heroism was reset.
    pub character: String,
    /// Heroism before the reset.
    pub previous: Heroism,
    /// Heroism after the reset.
    pub heroism: Heroism,
}

impl std::fmt::Display for HeroismNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} recovers their heroism ({}/{})",
            self.character, self.heroism.value, self.heroism.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_virtues_starts_full() {
        let h = Heroism::from_virtues(4, 5, 6);
        assert_eq!(h.max, 5);
        assert_eq!(h.value, 5);
    }

    #[test]
    fn max_rounds_down() {
        assert_eq!(heroism_max(2, 2, 3), 2);
        assert_eq!(heroism_max(1, 1, 0), 0);
    }

    #[test]
    fn bounds() {
        assert!(Heroism { value: 2, max: 3 }.in_bounds());
        assert!(!Heroism { value: 4, max: 3 }.in_bounds());
        assert!(!Heroism { value: -1, max: 3 }.in_bounds());
    }

    #[test]
    fn display() {
        assert_eq!(Heroism { value: 1, max: 4 }.to_string(), "Heroism: 1/4");
    }

    proptest! {
        #[test]
        fn reset_refills_to_average(b in 0..20i32, f in 0..20i32, l in 0..20i32) {
            let h = Heroism::from_virtues(b, f, l);
            prop_assert_eq!(h.value, h.max);
            prop_assert_eq!(h.max, (b + f + l) / 3);
            prop_assert!(h.in_bounds());
        }
    }
}
