//! Combat errors.

use super::state::TurnPhase;

/// Errors reported by the resolver and the combat session.
///
/// The resolver only ever returns `InvalidArgument`; the turn-order variants
/// come from [`crate::session::Combat`], which serializes turns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("out of turn: expected {expected}, combat is in {actual}")]
    OutOfTurn { expected: TurnPhase, actual: TurnPhase },

    #[error("combat is over ({0})")]
    CombatOver(TurnPhase),
}
