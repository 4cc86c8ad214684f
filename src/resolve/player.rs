//! Player attack resolution.
//!
//! Converts one gem clear into enemy damage, banks heal and shield from the
//! white and green gems, and applies the health-lock floor while level goals
//! are still open.

use serde::Serialize;
use tracing::debug;

use super::phase::advance;
use super::Outcome;
use crate::combat::{CombatConfig, CombatError, CombatState, GemClear, TurnPhase};

/// What one player attack did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerAttack {
    pub gems: GemClear,
    /// Damage computed from the clear, before clamping.
    pub damage: u32,
    /// Health the enemy actually lost.
    pub dealt: u32,
    pub heal_banked: u32,
    pub shield_banked: u32,
    /// True when the health-lock floor absorbed some of the damage.
    pub health_locked: bool,
    pub outcome: Outcome,
}

/// Computes the damage a clear deals: a flat amount per damaging gem, plus
/// a bonus for every gem beyond the combo threshold.
pub fn attack_damage(config: &CombatConfig, gems: &GemClear) -> Result<u32, CombatError> {
    let damaging = gems.damaging().ok_or_else(|| {
        CombatError::InvalidArgument(format!(
            "{} gems cleared cannot include {} white and {} green",
            gems.cleared, gems.white, gems.green
        ))
    })?;

    let mut damage = damaging.saturating_mul(config.base_damage_per_gem);
    if gems.cleared > config.combo_threshold {
        let extra = gems.cleared - config.combo_threshold;
        damage = damage.saturating_add(extra.saturating_mul(config.combo_bonus_per_gem));
    }
    Ok(damage)
}

/// Resolves a player attack.
///
/// With `goals_remaining > 0` the enemy cannot drop below 1 health. An enemy
/// already at 0 stays there. The turn passes to the enemy unless the attack
/// was lethal.
pub fn resolve_player_attack(
    state: &CombatState,
    config: &CombatConfig,
    gems: GemClear,
    goals_remaining: u32,
) -> Result<(CombatState, PlayerAttack), CombatError> {
    config.validate()?;
    let damage = attack_damage(config, &gems)?;

    let heal_banked = gems.white.saturating_mul(config.heal_per_white_gem);
    let shield_banked = gems.green.saturating_mul(config.shield_per_green_gem);

    let floor = if goals_remaining > 0 { 1 } else { 0 };
    let before = state.enemy_health.min(config.enemy_max_health);
    let unlocked = before.saturating_sub(damage);
    // The floor only holds health up; it never lifts an enemy already below it.
    let after = unlocked.max(floor.min(before));
    let health_locked = after > unlocked;

    let mut next = *state;
    next.enemy_health = after;
    next.pending_heal = next.pending_heal.saturating_add(heal_banked);
    next.pending_shield = next.pending_shield.saturating_add(shield_banked);

    let outcome = if after == 0 {
        Outcome::Lethal
    } else {
        Outcome::Hit
    };
    advance(&mut next, TurnPhase::PlayerTurn);

    debug!(
        cleared = gems.cleared,
        white = gems.white,
        green = gems.green,
        damage,
        enemy_health = after,
        health_locked,
        "player attack resolved"
    );

    Ok((
        next,
        PlayerAttack {
            gems,
            damage,
            dealt: before - after,
            heal_banked,
            shield_banked,
            health_locked,
            outcome,
        },
    ))
}
