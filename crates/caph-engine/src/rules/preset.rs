//! Pre-configured rulesets.

use crate::rules::{Rounding, Ruleset};
use crate::sheet::SkillKey;

/// The canonical rules.
///
/// Every player character gets full health, initiative rounds half up,
/// and attribute tests add the character's heroism to the pool.
pub fn standard() -> Ruleset {
    Ruleset {
        name: "standard".to_string(),
        health_subtypes: None,
        npc_health: 6,
        initiative_rounding: Rounding::HalfUp,
        initiative_threshold: 6,
        defence_skill: SkillKey::new("adventurer", "athletics"),
        attribute_test_heroism: true,
    }
}

/// The earlier rules: full health only for the two heroic subtypes and
/// initiative rounded down.
pub fn legacy() -> Ruleset {
    Ruleset {
        name: "legacy".to_string(),
        health_subtypes: Some(vec![
            "Dragon-marked".to_string(),
            "Valiant Captain".to_string(),
        ]),
        initiative_rounding: Rounding::Floor,
        ..standard()
    }
}

/// Look up a preset by name.
pub fn by_name(name: &str) -> Option<Ruleset> {
    match name.trim().to_lowercase().as_str() {
        "standard" => Some(standard()),
        "legacy" => Some(legacy()),
        _ => None,
    }
}
