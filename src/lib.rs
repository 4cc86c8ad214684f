//! gemclash combat library.
//!
//! Exposes the combat data model, the turn resolver, the combat session, and
//! the protocol and simulation modules for use by integration tests and the
//! binary entry points.

pub mod combat;
pub mod engine;
pub mod logging;
pub mod protocol;
pub mod resolve;
pub mod session;
pub mod simulate;
pub mod snapshot;
