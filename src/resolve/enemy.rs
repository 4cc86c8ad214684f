//! Enemy attack resolution.
//!
//! The enemy rolls damage from the configured range. Shield banked on the
//! player's turn is activated first and soaks the hit, the remainder comes
//! off player health, and any banked heal is applied afterwards.

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::phase::advance;
use super::Outcome;
use crate::combat::{CombatConfig, CombatError, CombatState, TurnPhase};

/// What one enemy attack did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnemyAttack {
    /// Damage rolled (or telegraphed) for the attack.
    pub damage: u32,
    /// Banked shield moved into the active shield, after the cap.
    pub shield_activated: u32,
    pub shield_used: u32,
    /// Damage that got through the shield.
    pub actual_damage: u32,
    pub heal_applied: u32,
    pub outcome: Outcome,
}

/// Rolls enemy damage uniformly from the configured inclusive range.
pub fn roll_enemy_damage<R: Rng>(
    config: &CombatConfig,
    rng: &mut R,
) -> Result<u32, CombatError> {
    config.validate()?;
    Ok(rng.gen_range(config.enemy_min_damage..=config.enemy_max_damage))
}

/// Resolves an enemy attack with a freshly rolled damage value.
pub fn resolve_enemy_attack<R: Rng>(
    state: &CombatState,
    config: &CombatConfig,
    rng: &mut R,
) -> Result<(CombatState, EnemyAttack), CombatError> {
    let damage = roll_enemy_damage(config, rng)?;
    resolve_enemy_attack_with_damage(state, config, damage)
}

/// Resolves an enemy attack whose damage was rolled earlier, e.g. to show the
/// enemy's intent during the player's turn.
///
/// `damage` must lie inside the configured enemy damage range.
pub fn resolve_enemy_attack_with_damage(
    state: &CombatState,
    config: &CombatConfig,
    damage: u32,
) -> Result<(CombatState, EnemyAttack), CombatError> {
    config.validate()?;
    if !(config.enemy_min_damage..=config.enemy_max_damage).contains(&damage) {
        return Err(CombatError::InvalidArgument(format!(
            "enemy damage {} outside {}..={}",
            damage, config.enemy_min_damage, config.enemy_max_damage
        )));
    }

    let mut next = *state;

    // Banked shield goes live first; anything above the cap is lost.
    let shield_before = state.shield.min(config.max_shield_amount);
    next.shield = shield_before
        .saturating_add(state.pending_shield)
        .min(config.max_shield_amount);
    let shield_activated = next.shield - shield_before;
    next.pending_shield = 0;

    let shield_used = damage.min(next.shield);
    let actual_damage = damage - shield_used;
    next.shield -= shield_used;

    next.player_health = state
        .player_health
        .min(config.player_max_health)
        .saturating_sub(actual_damage);

    let outcome = if next.player_health == 0 {
        Outcome::Lethal
    } else if shield_used > 0 && actual_damage == 0 {
        Outcome::Blocked
    } else if shield_used > 0 {
        Outcome::PartiallyBlocked
    } else if actual_damage > 0 {
        Outcome::Hit
    } else {
        Outcome::Miss
    };

    // Banked heal lands after the hit, unless the hit ended the battle.
    let heal_applied = if next.player_health > 0 {
        state
            .pending_heal
            .min(config.player_max_health - next.player_health)
    } else {
        0
    };
    next.player_health += heal_applied;
    next.pending_heal = 0;

    advance(&mut next, TurnPhase::EnemyTurn);

    debug!(
        damage,
        shield_used,
        actual_damage,
        heal_applied,
        player_health = next.player_health,
        "enemy attack resolved"
    );

    Ok((
        next,
        EnemyAttack {
            damage,
            shield_activated,
            shield_used,
            actual_damage,
            heal_applied,
            outcome,
        },
    ))
}
