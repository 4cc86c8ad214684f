//! Presentation snapshots.
//!
//! Read-only views of a battle for the health-bar and HUD layer: fill
//! fractions, health bands, and `current/max` labels. Presentation never
//! mutates combat state; it renders these.

use std::fmt;

use serde::Serialize;

use crate::combat::{CombatConfig, CombatState, TurnPhase};
use crate::resolve::phase;

/// Fill fraction above which a bar is in the high band.
const HIGH_BAND: f32 = 0.6;
/// Fill fraction above which a bar is in the medium band.
const MEDIUM_BAND: f32 = 0.3;

/// Coarse health level, used to colour health bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBand {
    High,
    Medium,
    Low,
}

/// One side's health pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthBar {
    pub current: u32,
    pub max: u32,
}

impl HealthBar {
    /// Fraction of the bar that is filled, in `0.0..=1.0`.
    pub fn fill(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        (self.current.min(self.max) as f32) / (self.max as f32)
    }

    pub fn band(&self) -> HealthBand {
        let fill = self.fill();
        if fill > HIGH_BAND {
            HealthBand::High
        } else if fill > MEDIUM_BAND {
            HealthBand::Medium
        } else {
            HealthBand::Low
        }
    }
}

impl fmt::Display for HealthBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// Everything the HUD shows about a battle at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombatSnapshot {
    pub phase: TurnPhase,
    pub player: HealthBar,
    pub enemy: HealthBar,
    pub player_fill: f32,
    pub enemy_fill: f32,
    pub player_band: HealthBand,
    pub enemy_band: HealthBand,
    pub shield: u32,
    pub max_shield: u32,
    pub pending_heal: u32,
    pub pending_shield: u32,
    /// True while level goals keep the enemy from dropping below 1.
    pub health_locked: bool,
    /// Damage the enemy will deal on its next attack, once telegraphed.
    pub enemy_intent: Option<u32>,
}

impl CombatSnapshot {
    pub fn new(
        state: &CombatState,
        config: &CombatConfig,
        goals_remaining: u32,
        enemy_intent: Option<u32>,
    ) -> Self {
        let player = HealthBar {
            current: state.player_health,
            max: config.player_max_health,
        };
        let enemy = HealthBar {
            current: state.enemy_health,
            max: config.enemy_max_health,
        };
        CombatSnapshot {
            phase: phase(state),
            player,
            enemy,
            player_fill: player.fill(),
            enemy_fill: enemy.fill(),
            player_band: player.band(),
            enemy_band: enemy.band(),
            shield: state.shield,
            max_shield: config.max_shield_amount,
            pending_heal: state.pending_heal,
            pending_shield: state.pending_shield,
            health_locked: goals_remaining > 0,
            enemy_intent,
        }
    }

    /// Serializes the snapshot as a single-line JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
