//! Derived statistics.
//!
//! Everything here is recomputed from the sheet on every pass and never
//! edited by hand. Derivation cannot fail: absent optional fields count
//! as zero, and arithmetic saturates at the bounds of `i32`.

use serde::{Deserialize, Serialize};

use crate::rules::Ruleset;
use crate::sheet::{CharacterKind, CharacterSheet};

/// Base passive defence before agility and athletics.
const BASE_DEFENCE: i32 = 6;

/// Secondary statistics computed from a character sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Maximum health.
    pub health_max: i32,
    /// Initiative score: the ceiling on the character's initiative roll.
    pub init_score: i32,
    /// Passive defence.
    pub defence: i32,
    /// Damage soaked per hit (player characters only).
    pub soak: Option<i32>,
    /// Experience awarded for defeating the character (non-player characters only).
    pub xp: Option<i32>,
}

/// Compute every derived statistic for a sheet under a ruleset.
pub fn derive(sheet: &CharacterSheet, ruleset: &Ruleset) -> DerivedStats {
    let attrs = &sheet.attributes;
    let is_player = sheet.kind == CharacterKind::PlayerCharacter;

    DerivedStats {
        health_max: health_max(sheet, ruleset),
        init_score: init_score(sheet, ruleset),
        defence: BASE_DEFENCE
            .saturating_add(attrs.agility)
            .saturating_add(sheet.skill(&ruleset.defence_skill)),
        soak: is_player.then_some(
            attrs
                .fortitude
                .saturating_add(sheet.virtues.heroism.max)
                .saturating_add(sheet.armor_soak),
        ),
        xp: (!is_player).then_some(
            sheet
                .challenge_rating
                .saturating_mul(sheet.challenge_rating)
                .saturating_mul(100),
        ),
    }
}

/// `1 + round((fortitude + agility + reasoning) / 3)` under the ruleset's rounding.
pub fn init_score(sheet: &CharacterSheet, ruleset: &Ruleset) -> i32 {
    let attrs = &sheet.attributes;
    let sum = attrs
        .fortitude
        .saturating_add(attrs.agility)
        .saturating_add(attrs.reasoning);
    ruleset.initiative_rounding.divide(sum, 3).saturating_add(1)
}

fn health_max(sheet: &CharacterSheet, ruleset: &Ruleset) -> i32 {
    match sheet.kind {
        CharacterKind::PlayerCharacter if ruleset.grants_full_health(sheet.subtype.as_deref()) => {
            sheet.attributes.fortitude.saturating_mul(10)
        }
        _ => ruleset.npc_health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rounding, preset};
    use crate::sheet::{AttributeSet, SkillKey};

    fn player(fortitude: i32, agility: i32, reasoning: i32) -> CharacterSheet {
        let mut sheet = CharacterSheet::new("Kael", CharacterKind::PlayerCharacter);
        sheet.attributes = AttributeSet {
            physical: 3,
            agility,
            fortitude,
            reasoning,
            social: 2,
        };
        sheet
    }

    #[test]
    fn player_character_stats() {
        let mut sheet = player(4, 3, 3);
        sheet.virtues.heroism.max = 5;
        sheet.armor_soak = 2;
        sheet.set_skill(&SkillKey::new("adventurer", "athletics"), 2);

        let stats = derive(&sheet, &Ruleset::default());
        assert_eq!(stats.health_max, 40);
        assert_eq!(stats.init_score, 4);
        assert_eq!(stats.defence, 11);
        assert_eq!(stats.soak, Some(11));
        assert_eq!(stats.xp, None);
    }

    #[test]
    fn npc_stats() {
        let mut sheet = CharacterSheet::new("Bandit", CharacterKind::NonPlayerCharacter);
        sheet.attributes.fortitude = 5;
        sheet.attributes.agility = 2;
        sheet.challenge_rating = 3;

        let stats = derive(&sheet, &Ruleset::default());
        assert_eq!(stats.health_max, 6);
        assert_eq!(stats.defence, 8);
        assert_eq!(stats.soak, None);
        assert_eq!(stats.xp, Some(900));
    }

    #[test]
    fn initiative_rounds_half_up() {
        // (4 + 3 + 4) / 3 = 3.67
        assert_eq!(init_score(&player(4, 3, 4), &Ruleset::default()), 5);
        // (4 + 3 + 3) / 3 = 3.33
        assert_eq!(init_score(&player(4, 3, 3), &Ruleset::default()), 4);
        assert_eq!(init_score(&player(0, 0, 0), &Ruleset::default()), 1);
    }

    #[test]
    fn legacy_initiative_floors() {
        let ruleset = Ruleset {
            initiative_rounding: Rounding::Floor,
            ..Ruleset::default()
        };
        assert_eq!(init_score(&player(4, 3, 4), &ruleset), 4);
    }

    #[test]
    fn legacy_health_requires_subtype() {
        let ruleset = preset::legacy();
        let mut sheet = player(4, 3, 3);
        assert_eq!(derive(&sheet, &ruleset).health_max, 6);

        sheet.subtype = Some("Dragon-marked".to_string());
        assert_eq!(derive(&sheet, &ruleset).health_max, 40);

        sheet.subtype = Some("valiant captain".to_string());
        assert_eq!(derive(&sheet, &ruleset).health_max, 40);
    }

    #[test]
    fn derive_is_pure() {
        let mut sheet = player(5, 4, 2);
        sheet.virtues.heroism.max = 3;
        let ruleset = Ruleset::default();
        assert_eq!(derive(&sheet, &ruleset), derive(&sheet, &ruleset));
    }

    #[test]
    fn extreme_values_saturate() {
        let mut npc = CharacterSheet::new("Wyrm", CharacterKind::NonPlayerCharacter);
        npc.challenge_rating = 5000;
        assert_eq!(derive(&npc, &Ruleset::default()).xp, Some(i32::MAX));

        let mut sheet = player(i32::MAX, i32::MAX, i32::MAX);
        sheet.armor_soak = i32::MAX;
        sheet.set_skill(&SkillKey::new("adventurer", "athletics"), i32::MAX);
        let stats = derive(&sheet, &Ruleset::default());
        assert_eq!(stats.health_max, i32::MAX);
        assert_eq!(stats.defence, i32::MAX);
        assert_eq!(stats.soak, Some(i32::MAX));
        assert_eq!(stats.init_score, i32::MAX / 3 + 1);
    }

    #[test]
    fn defence_skill_is_configurable() {
        let mut sheet = player(3, 3, 3);
        sheet.set_skill(&SkillKey::new("rogue", "stealth"), 4);
        let ruleset = Ruleset {
            defence_skill: SkillKey::new("rogue", "stealth"),
            ..Ruleset::default()
        };
        assert_eq!(derive(&sheet, &ruleset).defence, 13);
    }
}
