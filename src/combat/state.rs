//! Combat state representation.
//!
//! A `CombatState` is the complete numeric snapshot of a battle between two
//! turns: both health pools, the active shield, what the player has banked
//! for the next enemy turn, and whose turn it is.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::CombatConfig;

/// The turn phase of a battle. `Victory` and `Defeat` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    PlayerTurn,
    EnemyTurn,
    Victory,
    Defeat,
}

impl TurnPhase {
    /// Returns the protocol name of the phase.
    pub const fn name(self) -> &'static str {
        match self {
            TurnPhase::PlayerTurn => "player_turn",
            TurnPhase::EnemyTurn => "enemy_turn",
            TurnPhase::Victory => "victory",
            TurnPhase::Defeat => "defeat",
        }
    }

    /// Returns true once the battle has been decided.
    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::Victory | TurnPhase::Defeat)
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gems removed by one player match.
///
/// `cleared` counts every gem, including the white and green ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemClear {
    pub cleared: u32,
    pub white: u32,
    pub green: u32,
}

impl GemClear {
    /// A clear of ordinary gems only.
    pub const fn plain(cleared: u32) -> Self {
        GemClear {
            cleared,
            white: 0,
            green: 0,
        }
    }

    pub const fn new(cleared: u32, white: u32, green: u32) -> Self {
        GemClear {
            cleared,
            white,
            green,
        }
    }

    /// Gems that deal damage, or `None` when the specials outnumber the clear.
    pub fn damaging(&self) -> Option<u32> {
        self.cleared
            .checked_sub(self.white)
            .and_then(|rest| rest.checked_sub(self.green))
    }
}

/// Numeric state of one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatState {
    pub player_health: u32,
    pub enemy_health: u32,
    /// Active shield, absorbs enemy damage before health.
    pub shield: u32,
    pub is_player_turn: bool,
    /// Heal banked by white gems, applied after the next enemy attack.
    pub pending_heal: u32,
    /// Shield banked by green gems, activated at the next enemy attack.
    pub pending_shield: u32,
}

impl CombatState {
    /// Creates the opening state: full health, nothing banked, player to move.
    pub fn new(config: &CombatConfig) -> Self {
        CombatState {
            player_health: config.player_max_health,
            enemy_health: config.enemy_max_health,
            shield: 0,
            is_player_turn: true,
            pending_heal: 0,
            pending_shield: 0,
        }
    }

    /// Returns true if every value lies inside the bounds set by `config`.
    pub fn is_within(&self, config: &CombatConfig) -> bool {
        self.player_health <= config.player_max_health
            && self.enemy_health <= config.enemy_max_health
            && self.shield <= config.max_shield_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_full_health() {
        let config = CombatConfig {
            player_max_health: 80,
            enemy_max_health: 120,
            ..CombatConfig::default()
        };
        let state = CombatState::new(&config);
        assert_eq!(state.player_health, 80);
        assert_eq!(state.enemy_health, 120);
        assert_eq!(state.shield, 0);
        assert_eq!(state.pending_heal, 0);
        assert_eq!(state.pending_shield, 0);
        assert!(state.is_player_turn);
        assert!(state.is_within(&config));
    }

    #[test]
    fn is_within_detects_overflowed_values() {
        let config = CombatConfig::default();
        let mut state = CombatState::new(&config);
        state.shield = config.max_shield_amount + 1;
        assert!(!state.is_within(&config));
    }

    #[test]
    fn damaging_gems_subtract_specials() {
        assert_eq!(GemClear::new(6, 2, 1).damaging(), Some(3));
        assert_eq!(GemClear::plain(4).damaging(), Some(4));
        assert_eq!(GemClear::new(3, 2, 2).damaging(), None);
    }

    #[test]
    fn phase_names() {
        assert_eq!(TurnPhase::PlayerTurn.to_string(), "player_turn");
        assert_eq!(TurnPhase::Defeat.to_string(), "defeat");
        assert!(TurnPhase::Victory.is_terminal());
        assert!(!TurnPhase::EnemyTurn.is_terminal());
    }
}
