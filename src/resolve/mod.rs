//! Turn resolution.
//!
//! Resolves one player attack or one enemy attack against a combat state,
//! producing the next state and a report of what happened. Resolution is
//! pure apart from the injected random source used for enemy damage.

pub mod enemy;
pub mod phase;
pub mod player;

use std::fmt;

use serde::Serialize;

pub use enemy::{
    resolve_enemy_attack, resolve_enemy_attack_with_damage, roll_enemy_damage, EnemyAttack,
};
pub use phase::{advance, is_combat_over, next_phase, phase};
pub use player::{attack_damage, resolve_player_attack, PlayerAttack};

/// Classification of a resolved attack, used to pick animations and sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Hit,
    /// Shield absorbed the whole attack.
    Blocked,
    /// Shield absorbed part of the attack.
    PartiallyBlocked,
    /// The defender fell.
    Lethal,
    /// Zero damage and no shield involved.
    Miss,
}

impl Outcome {
    /// Returns the protocol name of the outcome.
    pub const fn name(self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::Blocked => "blocked",
            Outcome::PartiallyBlocked => "partially_blocked",
            Outcome::Lethal => "lethal",
            Outcome::Miss => "miss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
