//! Combat encounters and turn order.
//!
//! Tracks combatants, the round counter, and the initiative order. The
//! encounter is the default [`TurnOrderStore`]: initiative batches are
//! written to it all at once.

pub mod initiative;

pub use initiative::{
    InitiativeBatch, InitiativeUpdate, TurnOrderStore, draw_initiative, resolve_initiative,
    resolve_round,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::derived;
use crate::dice::RandomSource;
use crate::error::{EngineError, EngineResult};
use crate::rules::Ruleset;
use crate::sheet::CharacterSheet;

/// A participant in combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Unique id within the encounter.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Defeated combatants roll no initiative and take no turns.
    #[serde(default)]
    pub defeated: bool,
    /// Initiative score from the combatant's derived stats.
    pub init_score: i32,
    /// Initiative for the current round, once rolled.
    #[serde(default)]
    pub initiative: Option<i32>,
}

impl Combatant {
    /// Create a combatant with a known initiative score.
    pub fn new(id: impl Into<String>, name: impl Into<String>, init_score: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            defeated: false,
            init_score,
            initiative: None,
        }
    }

    /// Create a combatant from a character sheet, deriving its initiative score.
    pub fn from_sheet(id: impl Into<String>, sheet: &CharacterSheet, ruleset: &Ruleset) -> Self {
        Self::new(id, sheet.name.clone(), derived::init_score(sheet, ruleset))
    }
}

/// The state of an ongoing combat encounter.
#[derive(Debug, Clone, Default)]
pub struct Combat {
    /// All combatants in the encounter.
    pub combatants: Vec<Combatant>,
    /// Current round number (1-based, 0 before the start).
    pub round: u32,
    /// Position in `turn_order` of the combatant whose turn it is.
    turn_index: usize,
    /// Indices into `combatants`, in acting order.
    turn_order: Vec<usize>,
}

impl Combat {
    /// Create an empty encounter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant. Fails if the id is already taken.
    pub fn add_combatant(&mut self, combatant: Combatant) -> EngineResult<()> {
        if self.get(&combatant.id).is_some() {
            return Err(EngineError::InvalidSheet(format!(
                "combatant id '{}' is already in the encounter",
                combatant.id
            )));
        }
        self.combatants.push(combatant);
        self.sort_initiative();
        Ok(())
    }

    /// Look up a combatant by id.
    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Mark a combatant as defeated. Their last initiative is kept.
    pub fn defeat(&mut self, id: &str) -> EngineResult<()> {
        let combatant = self
            .combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EngineError::UnknownCombatant(id.to_string()))?;
        combatant.defeated = true;
        self.sort_initiative();
        Ok(())
    }

    /// Roll initiative for the named combatants and commit the batch.
    pub fn roll_initiative<R: RandomSource + ?Sized>(
        &mut self,
        ids: &[&str],
        ruleset: &Ruleset,
        rng: &mut R,
    ) -> EngineResult<InitiativeBatch> {
        let batch = resolve_initiative(&self.combatants, ids, ruleset, rng)?;
        self.apply_initiative(&batch)?;
        Ok(batch)
    }

    /// Roll initiative for every combatant, start the next round, and commit the batch.
    pub fn start_round<R: RandomSource + ?Sized>(
        &mut self,
        ruleset: &Ruleset,
        rng: &mut R,
    ) -> EngineResult<InitiativeBatch> {
        let batch = resolve_round(&self.combatants, ruleset, rng)?;
        self.apply_initiative(&batch)?;
        self.round += 1;
        self.turn_index = 0;
        Ok(batch)
    }

    /// Get the combatant whose turn it is.
    pub fn current_combatant(&self) -> EngineResult<&Combatant> {
        let idx = self
            .turn_order
            .get(self.turn_index)
            .ok_or(EngineError::NoActiveCombatant)?;
        Ok(&self.combatants[*idx])
    }

    /// Advance to the next turn. Returns true if a new round started.
    pub fn next_turn(&mut self) -> bool {
        if self.turn_order.is_empty() {
            return false;
        }
        self.turn_index += 1;
        if self.turn_index >= self.turn_order.len() {
            self.turn_index = 0;
            self.round += 1;
            true
        } else {
            false
        }
    }

    /// Active combatants in acting order.
    pub fn turn_order(&self) -> Vec<&Combatant> {
        self.turn_order.iter().map(|&i| &self.combatants[i]).collect()
    }

    /// Get the current round number.
    pub fn current_round(&self) -> u32 {
        self.round
    }

    /// Get the number of combatants.
    pub fn combatant_count(&self) -> usize {
        self.combatants.len()
    }

    /// Returns true if combat hasn't started yet.
    pub fn is_not_started(&self) -> bool {
        self.round == 0
    }

    /// Order active combatants by initiative (descending).
    ///
    /// Ties go to the higher initiative score, then to whoever joined
    /// first. Combatants without initiative act last. The turn stays with
    /// the combatant who holds it; if they left the order, it passes to the
    /// next survivor after them, or back to the top when none is left.
    fn sort_initiative(&mut self) {
        let mut indices: Vec<usize> = (0..self.combatants.len())
            .filter(|&i| !self.combatants[i].defeated)
            .collect();
        indices.sort_by(|&a, &b| {
            let (a, b) = (&self.combatants[a], &self.combatants[b]);
            b.initiative
                .cmp(&a.initiative)
                .then(b.init_score.cmp(&a.init_score))
        });

        let previous = std::mem::take(&mut self.turn_order);
        self.turn_index = previous
            .get(self.turn_index..)
            .into_iter()
            .flatten()
            .find_map(|&idx| indices.iter().position(|&i| i == idx))
            .unwrap_or(0);
        self.turn_order = indices;
    }
}

impl TurnOrderStore for Combat {
    fn apply_initiative(&mut self, batch: &InitiativeBatch) -> EngineResult<()> {
        // Resolve every target first so a bad id leaves the encounter untouched.
        let targets = batch
            .updates
            .iter()
            .map(|u| {
                self.combatants
                    .iter()
                    .position(|c| c.id == u.id)
                    .map(|idx| (idx, u.initiative))
                    .ok_or_else(|| EngineError::UnknownCombatant(u.id.clone()))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        for (idx, initiative) in targets {
            self.combatants[idx].initiative = Some(initiative);
        }
        self.sort_initiative();
        info!(updates = batch.len(), round = self.round, "applied initiative batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedSource;
    use crate::sheet::CharacterKind;

    fn encounter() -> Combat {
        let mut combat = Combat::new();
        combat.add_combatant(Combatant::new("alice", "Alice", 5)).unwrap();
        combat.add_combatant(Combatant::new("bob", "Bob", 4)).unwrap();
        combat.add_combatant(Combatant::new("charlie", "Charlie", 8)).unwrap();
        combat
    }

    #[test]
    fn combat_lifecycle() {
        let mut combat = encounter();
        assert!(combat.is_not_started());
        assert_eq!(combat.combatant_count(), 3);

        // alice 1d6 -> 3, bob 1d6 -> 2, charlie 2d6 -> 4 + 3
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        assert_eq!(combat.current_round(), 1);

        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");
        assert!(!combat.next_turn());
        assert_eq!(combat.current_combatant().unwrap().name, "Alice");
        assert!(!combat.next_turn());
        assert_eq!(combat.current_combatant().unwrap().name, "Bob");

        assert!(combat.next_turn());
        assert_eq!(combat.current_round(), 2);
        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");
    }

    #[test]
    fn ties_go_to_higher_score_then_join_order() {
        let mut combat = encounter();
        combat.add_combatant(Combatant::new("dara", "Dara", 5)).unwrap();
        // alice 3, bob 3, charlie 2 + 1, dara 3
        let mut source = ScriptedSource::new([3, 3, 2, 1, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();

        let order: Vec<&str> = combat.turn_order().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["charlie", "alice", "dara", "bob"]);
    }

    #[test]
    fn defeated_keep_initiative_and_leave_order() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        combat.defeat("bob").unwrap();

        let mut source = ScriptedSource::new([1, 1, 1]);
        let batch = combat.start_round(&Ruleset::default(), &mut source).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(combat.get("bob").unwrap().initiative, Some(2));
        assert_eq!(combat.turn_order().len(), 2);
        assert_eq!(combat.current_round(), 2);
    }

    #[test]
    fn defeating_an_earlier_combatant_keeps_the_turn() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        combat.next_turn();
        assert_eq!(combat.current_combatant().unwrap().name, "Alice");

        combat.defeat("charlie").unwrap();
        assert_eq!(combat.current_combatant().unwrap().name, "Alice");
        assert!(!combat.next_turn());
        assert_eq!(combat.current_combatant().unwrap().name, "Bob");
    }

    #[test]
    fn defeating_the_acting_combatant_passes_the_turn_on() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        combat.next_turn();

        combat.defeat("alice").unwrap();
        assert_eq!(combat.current_combatant().unwrap().name, "Bob");
    }

    #[test]
    fn defeating_the_last_in_order_wraps_to_the_top() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        combat.next_turn();
        combat.next_turn();
        assert_eq!(combat.current_combatant().unwrap().name, "Bob");

        combat.defeat("bob").unwrap();
        assert_eq!(combat.current_combatant().unwrap().name, "Charlie");
    }

    #[test]
    fn mid_round_initiative_keeps_the_turn() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        combat.start_round(&Ruleset::default(), &mut source).unwrap();
        combat.next_turn();

        // bob rerolls into first place
        let mut source = ScriptedSource::new([4]);
        combat.roll_initiative(&["bob"], &Ruleset::default(), &mut source).unwrap();
        let order: Vec<&str> = combat.turn_order().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["charlie", "bob", "alice"]);
        assert_eq!(combat.current_combatant().unwrap().name, "Alice");
    }

    #[test]
    fn unknown_combatant_leaves_encounter_untouched() {
        let mut combat = encounter();
        let mut source = ScriptedSource::new([3, 2, 4, 3]);
        let err = combat
            .roll_initiative(&["alice", "zed"], &Ruleset::default(), &mut source)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCombatant(_)));
        assert!(combat.combatants.iter().all(|c| c.initiative.is_none()));
    }

    #[test]
    fn apply_rejects_foreign_batch_atomically() {
        let mut combat = encounter();
        let batch = InitiativeBatch {
            updates: vec![
                InitiativeUpdate {
                    id: "alice".to_string(),
                    initiative: 4,
                    roll: Default::default(),
                    capped: false,
                },
                InitiativeUpdate {
                    id: "mallory".to_string(),
                    initiative: 6,
                    roll: Default::default(),
                    capped: false,
                },
            ],
        };
        assert!(combat.apply_initiative(&batch).is_err());
        assert_eq!(combat.get("alice").unwrap().initiative, None);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut combat = encounter();
        assert!(combat.add_combatant(Combatant::new("alice", "Alice II", 3)).is_err());
    }

    #[test]
    fn empty_combat_error() {
        let combat = Combat::new();
        assert!(matches!(
            combat.current_combatant(),
            Err(EngineError::NoActiveCombatant)
        ));
    }

    #[test]
    fn from_sheet_derives_score() {
        let mut sheet = CharacterSheet::new("Kael", CharacterKind::PlayerCharacter);
        sheet.attributes.fortitude = 4;
        sheet.attributes.agility = 3;
        sheet.attributes.reasoning = 4;
        let combatant = Combatant::from_sheet("kael", &sheet, &Ruleset::default());
        assert_eq!(combatant.init_score, 5);
        assert_eq!(combatant.name, "Kael");
    }
}
