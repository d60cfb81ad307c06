//! Error types for the resolution engine.

/// Errors that can occur during engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The random source could not supply a face for a die.
    #[error("no random source available to resolve the roll")]
    ResolutionUnavailable,

    /// An initiative batch referenced a combatant that is not in the encounter.
    #[error("unknown combatant: {0}")]
    UnknownCombatant(String),

    /// A dice pool was requested from negative stat values.
    #[error("invalid pool request: {0}")]
    InvalidPoolRequest(String),

    /// An attribute key did not name one of the five attributes.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// No combatant is currently able to act.
    #[error("no active combatant")]
    NoActiveCombatant,

    /// A character snapshot could not be read.
    #[error("invalid character sheet: {0}")]
    InvalidSheet(String),

    /// A ruleset configuration could not be read.
    #[error("invalid ruleset: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
