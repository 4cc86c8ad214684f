//! GCI protocol handling.
//!
//! This module implements parsing and formatting for the GCI (Gem Combat
//! Interface) protocol: the command parser for the main loop and the
//! single-line reports written back for each resolved attack.

pub mod notation;
pub mod parser;

pub use notation::{format_enemy_attack, format_player_attack};
pub use parser::{parse_command, Command};
