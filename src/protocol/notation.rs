//! Response line formatting.
//!
//! Every resolved attack is reported on a single line so drivers can split on
//! whitespace and read key/value pairs:
//!
//! ```text
//! player hit damage 60 enemy 40/100 heal +0 shield +0
//! enemy partially_blocked roll 15 blocked 10 damage 5 heal 20 player 70/100 shield 0
//! ```

use crate::combat::{CombatConfig, CombatState};
use crate::resolve::{EnemyAttack, PlayerAttack};
use crate::snapshot::HealthBar;

/// Formats the report for a player attack.
pub fn format_player_attack(
    attack: &PlayerAttack,
    state: &CombatState,
    config: &CombatConfig,
) -> String {
    let enemy = HealthBar {
        current: state.enemy_health,
        max: config.enemy_max_health,
    };
    let mut line = format!(
        "player {} damage {} enemy {} heal +{} shield +{}",
        attack.outcome, attack.dealt, enemy, attack.heal_banked, attack.shield_banked
    );
    if attack.health_locked {
        line.push_str(" locked");
    }
    line
}

/// Formats the report for an enemy attack.
pub fn format_enemy_attack(
    attack: &EnemyAttack,
    state: &CombatState,
    config: &CombatConfig,
) -> String {
    let player = HealthBar {
        current: state.player_health,
        max: config.player_max_health,
    };
    format!(
        "enemy {} roll {} blocked {} damage {} heal {} player {} shield {}",
        attack.outcome,
        attack.damage,
        attack.shield_used,
        attack.actual_damage,
        attack.heal_applied,
        player,
        state.shield
    )
}
