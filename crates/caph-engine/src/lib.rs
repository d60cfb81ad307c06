//! Task resolution and turn-order engine for dragon-dice tabletop play.
//!
//! Derives secondary statistics from a character snapshot, builds dice
//! pools with exploding dragon dice, evaluates them against an injected
//! random source, and resolves capped initiative for combat rounds.

pub mod combat;
pub mod derived;
pub mod dice;
pub mod error;
pub mod rules;
pub mod sheet;
pub mod validate;

pub use combat::{Combat, Combatant, InitiativeBatch, TurnOrderStore, resolve_initiative};
pub use derived::{DerivedStats, derive};
pub use dice::{DicePool, DieKind, DieResult, RandomSource, RollOutcome, ScriptedSource, build_pool, evaluate};
pub use error::{EngineError, EngineResult};
pub use rules::{Rounding, Ruleset, TestCategory, TestRequest, TestResult, perform_test};
pub use sheet::{Attribute, AttributeSet, CharacterKind, CharacterSheet, Heroism, HeroismNotice, SkillKey, VirtueSet};
pub use validate::{validate_ruleset, validate_sheet};
