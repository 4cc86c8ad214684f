//! Turn sequencing logic.
//!
//! Derives the turn phase of a combat state and the phase that follows a
//! resolved attack.
//!
//! Phase flow:
//! - Player turn -> Enemy turn, or Victory if the enemy fell
//! - Enemy turn  -> Player turn, or Defeat if the player fell
//! - Victory and Defeat are terminal

use crate::combat::{CombatState, TurnPhase};

/// Returns the phase a state is in. A fallen side decides the battle no
/// matter whose turn the flag says it is.
pub fn phase(state: &CombatState) -> TurnPhase {
    if state.enemy_health == 0 {
        TurnPhase::Victory
    } else if state.player_health == 0 {
        TurnPhase::Defeat
    } else if state.is_player_turn {
        TurnPhase::PlayerTurn
    } else {
        TurnPhase::EnemyTurn
    }
}

/// Returns the terminal phase if the battle has been decided.
pub fn is_combat_over(state: &CombatState) -> Option<TurnPhase> {
    let p = phase(state);
    if p.is_terminal() {
        Some(p)
    } else {
        None
    }
}

/// Computes the phase that follows `current` once its attack has resolved.
pub fn next_phase(current: TurnPhase, defender_fell: bool) -> TurnPhase {
    match current {
        TurnPhase::PlayerTurn if defender_fell => TurnPhase::Victory,
        TurnPhase::PlayerTurn => TurnPhase::EnemyTurn,
        TurnPhase::EnemyTurn if defender_fell => TurnPhase::Defeat,
        TurnPhase::EnemyTurn => TurnPhase::PlayerTurn,
        terminal => terminal,
    }
}

/// Moves `state` past an attack resolved during `current` and returns the
/// phase that follows. The turn flag only changes hands while both sides
/// stand.
pub fn advance(state: &mut CombatState, current: TurnPhase) -> TurnPhase {
    let defender_fell = match current {
        TurnPhase::PlayerTurn => state.enemy_health == 0,
        TurnPhase::EnemyTurn => state.player_health == 0,
        terminal => return terminal,
    };
    let next = next_phase(current, defender_fell);
    match next {
        TurnPhase::PlayerTurn => state.is_player_turn = true,
        TurnPhase::EnemyTurn => state.is_player_turn = false,
        TurnPhase::Victory | TurnPhase::Defeat => {}
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::CombatConfig;

    #[test]
    fn fresh_combat_is_player_turn() {
        let state = CombatState::new(&CombatConfig::default());
        assert_eq!(phase(&state), TurnPhase::PlayerTurn);
        assert_eq!(is_combat_over(&state), None);
    }

    #[test]
    fn flag_selects_enemy_turn() {
        let mut state = CombatState::new(&CombatConfig::default());
        state.is_player_turn = false;
        assert_eq!(phase(&state), TurnPhase::EnemyTurn);
    }

    #[test]
    fn zero_health_is_terminal() {
        let mut state = CombatState::new(&CombatConfig::default());
        state.enemy_health = 0;
        assert_eq!(is_combat_over(&state), Some(TurnPhase::Victory));

        let mut state = CombatState::new(&CombatConfig::default());
        state.player_health = 0;
        state.is_player_turn = false;
        assert_eq!(is_combat_over(&state), Some(TurnPhase::Defeat));
    }

    #[test]
    fn transitions() {
        assert_eq!(next_phase(TurnPhase::PlayerTurn, false), TurnPhase::EnemyTurn);
        assert_eq!(next_phase(TurnPhase::PlayerTurn, true), TurnPhase::Victory);
        assert_eq!(next_phase(TurnPhase::EnemyTurn, false), TurnPhase::PlayerTurn);
        assert_eq!(next_phase(TurnPhase::EnemyTurn, true), TurnPhase::Defeat);
        assert_eq!(next_phase(TurnPhase::Victory, false), TurnPhase::Victory);
        assert_eq!(next_phase(TurnPhase::Defeat, true), TurnPhase::Defeat);
    }

    #[test]
    fn advance_hands_over_the_turn() {
        let mut state = CombatState::new(&CombatConfig::default());
        assert_eq!(advance(&mut state, TurnPhase::PlayerTurn), TurnPhase::EnemyTurn);
        assert!(!state.is_player_turn);
        assert_eq!(phase(&state), TurnPhase::EnemyTurn);

        assert_eq!(advance(&mut state, TurnPhase::EnemyTurn), TurnPhase::PlayerTurn);
        assert!(state.is_player_turn);
    }

    #[test]
    fn advance_keeps_the_flag_when_the_defender_falls() {
        let mut state = CombatState::new(&CombatConfig::default());
        state.enemy_health = 0;
        assert_eq!(advance(&mut state, TurnPhase::PlayerTurn), TurnPhase::Victory);
        assert!(state.is_player_turn);

        let mut state = CombatState::new(&CombatConfig::default());
        state.is_player_turn = false;
        state.player_health = 0;
        assert_eq!(advance(&mut state, TurnPhase::EnemyTurn), TurnPhase::Defeat);
        assert!(!state.is_player_turn);
        assert_eq!(is_combat_over(&state), Some(TurnPhase::Defeat));
    }
}
