//! Integrity checks for character snapshots and rulesets.
//!
//! The engine rejects negative stats when it builds a pool; these checks
//! report the same faults up front, together with softer warnings.

use crate::rules::Ruleset;
use crate::sheet::{Attribute, CharacterSheet, heroism_max};

/// A warning or error found during validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// What the issue was found in (a character or ruleset name).
    pub subject: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Validate a character snapshot.
pub fn validate_sheet(sheet: &CharacterSheet) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut push = |message: String, is_error: bool| {
        issues.push(ValidationIssue {
            subject: sheet.name.clone(),
            message,
            is_error,
        });
    };

    if sheet.name.trim().is_empty() {
        push("character has no name".to_string(), false);
    }

    for attribute in Attribute::ALL {
        let value = sheet.attribute(attribute);
        if value < 0 {
            push(format!("attribute '{attribute}' is negative ({value})"), true);
        }
    }

    for (key, value) in sheet.skill_entries() {
        if value < 0 {
            push(format!("skill '{key}' is negative ({value})"), true);
        }
    }

    let virtues = &sheet.virtues;
    for (name, value) in [
        ("bravery", virtues.bravery),
        ("faith", virtues.faith),
        ("loyalty", virtues.loyalty),
    ] {
        if value < 0 {
            push(format!("virtue '{name}' is negative ({value})"), true);
        }
    }

    if !virtues.heroism.in_bounds() {
        push(
            format!(
                "heroism {} is outside 0..={}",
                virtues.heroism.value, virtues.heroism.max
            ),
            true,
        );
    }

    let expected = heroism_max(virtues.bravery, virtues.faith, virtues.loyalty);
    if virtues.heroism.max != expected {
        push(
            format!(
                "heroism max {} does not match virtues ({expected}); reset heroism",
                virtues.heroism.max
            ),
            false,
        );
    }

    if sheet.dragon_dice < 0 {
        push(format!("dragon dice are negative ({})", sheet.dragon_dice), true);
    }
    if sheet.armor_soak < 0 {
        push(format!("armor soak is negative ({})", sheet.armor_soak), false);
    }
    if sheet.challenge_rating < 0 {
        push(
            format!("challenge rating is negative ({})", sheet.challenge_rating),
            false,
        );
    }

    issues
}

/// Validate ruleset internal consistency.
pub fn validate_ruleset(ruleset: &Ruleset) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let subject = format!("ruleset '{}'", ruleset.name);

    if ruleset.npc_health <= 0 {
        issues.push(ValidationIssue {
            subject: subject.clone(),
            message: format!("npc health must be positive ({})", ruleset.npc_health),
            is_error: true,
        });
    }

    if ruleset
        .health_subtypes
        .as_ref()
        .is_some_and(|subtypes| subtypes.is_empty())
    {
        issues.push(ValidationIssue {
            subject: subject.clone(),
            message: "empty health subtype list: no player character gets full health"
                .to_string(),
            is_error: false,
        });
    }

    if ruleset.initiative_threshold < 1 {
        issues.push(ValidationIssue {
            subject,
            message: format!(
                "initiative threshold {} makes every combatant roll 2d6",
                ruleset.initiative_threshold
            ),
            is_error: false,
        });
    }

    issues
}
