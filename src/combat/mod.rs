//! Combat data model.
//!
//! Contains the configuration, the per-battle state record, gem clears and
//! the error type shared by the resolver and the session.

pub mod config;
pub mod error;
pub mod state;

pub use config::{CombatConfig, ConfigError, OptionSpec, OPTIONS};
pub use error::CombatError;
pub use state::{CombatState, GemClear, TurnPhase};
