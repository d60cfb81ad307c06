//! Roll evaluation and results.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{D6_FACES, DicePool, DieKind, RandomSource};
use crate::error::EngineResult;

/// The result of rolling a single die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The kind of die that was rolled.
    pub kind: DieKind,
    /// The first face rolled.
    pub face: u32,
    /// Whether the die rolled at least one 6 and exploded.
    pub exploded: bool,
    /// Every face rolled for this die, in roll order.
    pub chain: Vec<u32>,
}

impl DieResult {
    /// A plain die showing `face`.
    pub fn plain(face: u32) -> Self {
        Self {
            kind: DieKind::Plain,
            face,
            exploded: false,
            chain: vec![face],
        }
    }

    /// An exploding die with its full chain of faces.
    pub fn exploding(kind: DieKind, chain: Vec<u32>) -> Self {
        Self {
            kind,
            face: chain.first().copied().unwrap_or(0),
            exploded: chain.len() > 1,
            chain,
        }
    }

    /// This die's contribution to the total.
    pub fn total(&self) -> u32 {
        self.chain.iter().sum()
    }
}

/// The outcome of rolling a whole pool.
///
/// Plain dice are sorted ascending for display; dragon dice follow in label
/// order with their chains in roll order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Individual die results.
    pub dice: Vec<DieResult>,
    /// Sum of every face rolled.
    pub total: u32,
}

impl RollOutcome {
    fn new(dice: Vec<DieResult>) -> Self {
        let total = dice.iter().map(DieResult::total).sum();
        Self { dice, total }
    }

    /// Faces of the plain dice.
    pub fn plain_faces(&self) -> Vec<u32> {
        self.dice
            .iter()
            .filter(|d| d.kind == DieKind::Plain)
            .map(|d| d.face)
            .collect()
    }

    /// Results of the dragon dice.
    pub fn dragon_dice(&self) -> Vec<&DieResult> {
        self.dice.iter().filter(|d| d.kind.explodes()).collect()
    }

    /// How many dragon dice exploded at least once.
    pub fn explosions(&self) -> usize {
        self.dice.iter().filter(|d| d.exploded).count()
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plain = self.plain_faces();
        let mut parts = Vec::new();
        if !plain.is_empty() || self.dice.is_empty() {
            parts.push(format!("[{}]", join(&plain)));
        }
        for die in self.dragon_dice() {
            parts.push(format!("{} [{}]", die.kind, join(&die.chain)));
        }
        write!(f, "{} = {}", parts.join(" + "), self.total)
    }
}

fn join(values: &[u32]) -> String {
    let values: Vec<String> = values.iter().map(u32::to_string).collect();
    values.join(", ")
}

/// Roll a pool: plain dice once each, then every dragon die with open-ended explosion.
pub fn evaluate<R: RandomSource + ?Sized>(pool: &DicePool, rng: &mut R) -> EngineResult<RollOutcome> {
    let mut plain = Vec::with_capacity(pool.plain as usize);
    for _ in 0..pool.plain {
        plain.push(rng.draw(D6_FACES)?);
    }
    plain.sort_unstable();

    let mut dice: Vec<DieResult> = plain.into_iter().map(DieResult::plain).collect();
    for kind in pool.dragon_dice() {
        dice.push(DieResult::exploding(kind, roll_exploding(rng)?));
    }

    let outcome = RollOutcome::new(dice);
    debug!(formula = %pool, total = outcome.total, explosions = outcome.explosions(), "evaluated roll");
    Ok(outcome)
}

/// Roll one die, rolling again and adding for as long as it shows a 6.
fn roll_exploding<R: RandomSource + ?Sized>(rng: &mut R) -> EngineResult<Vec<u32>> {
    let mut chain = Vec::new();
    loop {
        let face = rng.draw(D6_FACES)?;
        chain.push(face);
        if face != D6_FACES {
            return Ok(chain);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedSource;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn unskilled_scenario_total() {
        let pool = DicePool::new().add_plain(3).add_dragon(1);
        let mut source = ScriptedSource::new([2, 4, 5, 6, 3]);
        let outcome = evaluate(&pool, &mut source).unwrap();
        assert_eq!(outcome.total, 20);
        assert_eq!(outcome.plain_faces(), vec![2, 4, 5]);
        let dragon = outcome.dragon_dice();
        assert_eq!(dragon.len(), 1);
        assert_eq!(dragon[0].chain, vec![6, 3]);
        assert_eq!(dragon[0].face, 6);
        assert!(dragon[0].exploded);
        assert_eq!(dragon[0].total(), 9);
    }

    #[test]
    fn plain_dice_sorted_ascending() {
        let pool = DicePool::new().add_plain(4);
        let mut source = ScriptedSource::new([5, 1, 6, 3]);
        let outcome = evaluate(&pool, &mut source).unwrap();
        assert_eq!(outcome.plain_faces(), vec![1, 3, 5, 6]);
        assert_eq!(outcome.explosions(), 0);
        assert_eq!(outcome.total, 15);
    }

    #[test]
    fn dragon_chains_keep_roll_order() {
        let pool = DicePool::new().add_dragon(2);
        let mut source = ScriptedSource::new([6, 6, 1, 4]);
        let outcome = evaluate(&pool, &mut source).unwrap();
        let dragon = outcome.dragon_dice();
        assert_eq!(dragon[0].chain, vec![6, 6, 1]);
        assert_eq!(dragon[0].kind, DieKind::Dragon { index: 1, of: 2 });
        assert_eq!(dragon[1].chain, vec![4]);
        assert!(!dragon[1].exploded);
        assert_eq!(outcome.total, 17);
    }

    #[test]
    fn long_explosion_runs_until_first_non_six() {
        let pool = DicePool::new().add_dragon(1);
        let mut source = ScriptedSource::new([6, 6, 6, 6, 6, 6, 2, 5]);
        let outcome = evaluate(&pool, &mut source).unwrap();
        assert_eq!(outcome.dice[0].chain, vec![6, 6, 6, 6, 6, 6, 2]);
        assert_eq!(outcome.total, 38);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn explosion_outlasting_the_source_is_unavailable() {
        let pool = DicePool::new().add_dragon(2);
        let mut source = ScriptedSource::new([6; 12]);
        assert!(matches!(
            evaluate(&pool, &mut source),
            Err(EngineError::ResolutionUnavailable)
        ));
    }

    #[test]
    fn plain_sixes_do_not_explode() {
        let pool = DicePool::new().add_plain(2);
        let mut source = ScriptedSource::new([6, 6]);
        let outcome = evaluate(&pool, &mut source).unwrap();
        assert_eq!(outcome.total, 12);
        assert_eq!(outcome.dice.len(), 2);
    }

    #[test]
    fn empty_pool_is_auto_fail() {
        let mut source = ScriptedSource::default();
        let outcome = evaluate(&DicePool::new(), &mut source).unwrap();
        assert!(outcome.dice.is_empty());
        assert_eq!(outcome.total, 0);
    }

    #[test]
    fn missing_entropy_is_unavailable() {
        let pool = DicePool::new().add_plain(1);
        let mut source = ScriptedSource::default();
        assert!(matches!(
            pool.roll(&mut source),
            Err(EngineError::ResolutionUnavailable)
        ));
    }

    #[test]
    fn seeded_rolls_are_deterministic() {
        let pool = DicePool::new().add_plain(5).add_dragon(2);
        let r1 = pool.roll(&mut StdRng::seed_from_u64(99)).unwrap();
        let r2 = pool.roll(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.plain_faces().len(), 5);
    }

    #[test]
    fn display() {
        let pool = DicePool::new().add_plain(3).add_dragon(1);
        let outcome = evaluate(&pool, &mut ScriptedSource::new([5, 2, 4, 6, 3])).unwrap();
        insta::assert_snapshot!(outcome.to_string(), @"[2, 4, 5] + Dragon Die [6, 3] = 20");
    }

    #[test]
    fn display_dragon_only() {
        let pool = DicePool::new().add_dragon(2);
        let outcome = evaluate(&pool, &mut ScriptedSource::new([3, 6, 1])).unwrap();
        insta::assert_snapshot!(outcome.to_string(), @"Dragon Die 1 [3] + Dragon Die 2 [6, 1] = 10");
    }

    #[test]
    fn display_empty() {
        assert_eq!(RollOutcome::default().to_string(), "[] = 0");
    }
}
