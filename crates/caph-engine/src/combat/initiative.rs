//! Initiative resolution.
//!
//! Each active combatant rolls 1d6, or 2d6 when their initiative score is
//! above the ruleset threshold. A roll above the score is capped at the
//! score: nobody acts faster than their composite speed, but a bad roll
//! can make them act slower.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{DicePool, RandomSource, RollOutcome};
use crate::error::{EngineError, EngineResult};
use crate::rules::Ruleset;

use super::Combatant;

/// The initiative drawn for one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeUpdate {
    /// Combatant id.
    pub id: String,
    /// The initiative to write back.
    pub initiative: i32,
    /// The dice that were rolled.
    pub roll: RollOutcome,
    /// Whether the roll exceeded the initiative score and was capped.
    pub capped: bool,
}

/// Every initiative update of one round, applied as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeBatch {
    /// Updates in request order.
    pub updates: Vec<InitiativeUpdate>,
}

impl InitiativeBatch {
    /// The initiative drawn for a combatant, if it was part of the batch.
    pub fn get(&self, id: &str) -> Option<i32> {
        self.updates
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.initiative)
    }

    /// The batch as a map from combatant id to initiative.
    pub fn to_map(&self) -> BTreeMap<String, i32> {
        self.updates
            .iter()
            .map(|u| (u.id.clone(), u.initiative))
            .collect()
    }

    /// Number of updates.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Returns true if no combatant received an initiative.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// An external store of turn order that accepts initiative batches.
///
/// Implementations must apply a batch entirely or not at all.
pub trait TurnOrderStore {
    /// Write every update in the batch.
    fn apply_initiative(&mut self, batch: &InitiativeBatch) -> EngineResult<()>;
}

/// Resolve initiative for the combatants named in `ids`.
///
/// Every id is checked before any die is rolled; an unknown id aborts the
/// whole batch with [`EngineError::UnknownCombatant`]. A repeated id rolls
/// once, so the batch holds at most one update per combatant. Defeated
/// combatants are skipped and receive no update.
pub fn resolve_initiative<R: RandomSource + ?Sized>(
    combatants: &[Combatant],
    ids: &[&str],
    ruleset: &Ruleset,
    rng: &mut R,
) -> EngineResult<InitiativeBatch> {
    let mut selected: Vec<&Combatant> = Vec::with_capacity(ids.len());
    for id in ids {
        let combatant = combatants
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| EngineError::UnknownCombatant((*id).to_string()))?;
        if selected.iter().any(|c| c.id == combatant.id) {
            debug!(id, "ignoring repeated combatant id");
            continue;
        }
        selected.push(combatant);
    }

    let mut updates = Vec::with_capacity(selected.len());
    for combatant in selected {
        if combatant.defeated {
            debug!(id = %combatant.id, "skipping defeated combatant");
            continue;
        }
        updates.push(draw_initiative(combatant, ruleset, rng)?);
    }
    Ok(InitiativeBatch { updates })
}

/// Resolve initiative for every combatant in the list.
pub fn resolve_round<R: RandomSource + ?Sized>(
    combatants: &[Combatant],
    ruleset: &Ruleset,
    rng: &mut R,
) -> EngineResult<InitiativeBatch> {
    let ids: Vec<&str> = combatants.iter().map(|c| c.id.as_str()).collect();
    resolve_initiative(combatants, &ids, ruleset, rng)
}

/// Roll one combatant's initiative and apply the cap.
pub fn draw_initiative<R: RandomSource + ?Sized>(
    combatant: &Combatant,
    ruleset: &Ruleset,
    rng: &mut R,
) -> EngineResult<InitiativeUpdate> {
    let dice = if combatant.init_score > ruleset.initiative_threshold {
        2
    } else {
        1
    };
    let roll = DicePool::new().add_plain(dice).roll(rng)?;
    let total = i32::try_from(roll.total).unwrap_or(i32::MAX);
    let capped = total > combatant.init_score;
    let initiative = if capped { combatant.init_score } else { total };

    debug!(id = %combatant.id, dice, total, initiative, capped, "drew initiative");
    Ok(InitiativeUpdate {
        id: combatant.id.clone(),
        initiative,
        roll,
        capped,
    })
}
