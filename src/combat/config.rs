//! Combat configuration.
//!
//! Holds the per-level tuning numbers for a battle: health pools, damage per
//! gem, combo bonus, enemy damage range, and the shield/heal yields of green
//! and white gems. Configurations load from JSON and can be overridden one
//! field at a time through named options.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::CombatError;

/// Errors that can occur while loading or editing a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown option: '{0}'")]
    UnknownOption(String),

    #[error("invalid value for option '{name}': '{value}'")]
    InvalidValue { name: String, value: String },

    #[error(transparent)]
    Invalid(#[from] CombatError),
}

/// Tuning numbers for one battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_max_health: u32,
    pub enemy_max_health: u32,
    pub base_damage_per_gem: u32,
    /// Gems cleared beyond this count earn the combo bonus.
    pub combo_threshold: u32,
    pub combo_bonus_per_gem: u32,
    pub enemy_min_damage: u32,
    pub enemy_max_damage: u32,
    pub max_shield_amount: u32,
    pub heal_per_white_gem: u32,
    pub shield_per_green_gem: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            player_max_health: 100,
            enemy_max_health: 100,
            base_damage_per_gem: 10,
            combo_threshold: 3,
            combo_bonus_per_gem: 5,
            enemy_min_damage: 5,
            enemy_max_damage: 15,
            max_shield_amount: 50,
            heal_per_white_gem: 5,
            shield_per_green_gem: 5,
        }
    }
}

/// A named, settable configuration field as advertised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
}

/// Every option accepted by [`CombatConfig::set_option`], in handshake order.
pub const OPTIONS: [OptionSpec; 10] = [
    OptionSpec { name: "PlayerMaxHealth", min: 1, max: 100_000 },
    OptionSpec { name: "EnemyMaxHealth", min: 1, max: 100_000 },
    OptionSpec { name: "BaseDamagePerGem", min: 0, max: 10_000 },
    OptionSpec { name: "ComboThreshold", min: 0, max: 1_000 },
    OptionSpec { name: "ComboBonusPerGem", min: 0, max: 10_000 },
    OptionSpec { name: "EnemyMinDamage", min: 0, max: 100_000 },
    OptionSpec { name: "EnemyMaxDamage", min: 0, max: 100_000 },
    OptionSpec { name: "MaxShieldAmount", min: 0, max: 100_000 },
    OptionSpec { name: "HealPerWhiteGem", min: 0, max: 10_000 },
    OptionSpec { name: "ShieldPerGreenGem", min: 0, max: 10_000 },
];

impl CombatConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations the resolver cannot work with.
    pub fn validate(&self) -> Result<(), CombatError> {
        if self.player_max_health == 0 {
            return Err(CombatError::InvalidArgument(
                "player max health must be positive".to_string(),
            ));
        }
        if self.enemy_max_health == 0 {
            return Err(CombatError::InvalidArgument(
                "enemy max health must be positive".to_string(),
            ));
        }
        if self.enemy_min_damage > self.enemy_max_damage {
            return Err(CombatError::InvalidArgument(format!(
                "enemy damage range is empty: min {} > max {}",
                self.enemy_min_damage, self.enemy_max_damage
            )));
        }
        Ok(())
    }

    /// Returns the current value of a named option.
    pub fn option(&self, name: &str) -> Option<u32> {
        let value = match name {
            "PlayerMaxHealth" => self.player_max_health,
            "EnemyMaxHealth" => self.enemy_max_health,
            "BaseDamagePerGem" => self.base_damage_per_gem,
            "ComboThreshold" => self.combo_threshold,
            "ComboBonusPerGem" => self.combo_bonus_per_gem,
            "EnemyMinDamage" => self.enemy_min_damage,
            "EnemyMaxDamage" => self.enemy_max_damage,
            "MaxShieldAmount" => self.max_shield_amount,
            "HealPerWhiteGem" => self.heal_per_white_gem,
            "ShieldPerGreenGem" => self.shield_per_green_gem,
            _ => return None,
        };
        Some(value)
    }

    /// Sets a named option from its textual value.
    ///
    /// Only the single field is checked here; cross-field rules such as the
    /// enemy damage range are checked by [`CombatConfig::validate`].
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let opt = OPTIONS
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        let parsed = value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|v| (opt.min..=opt.max).contains(v))
            .ok_or_else(|| ConfigError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            })?;

        let field = match name {
            "PlayerMaxHealth" => &mut self.player_max_health,
            "EnemyMaxHealth" => &mut self.enemy_max_health,
            "BaseDamagePerGem" => &mut self.base_damage_per_gem,
            "ComboThreshold" => &mut self.combo_threshold,
            "ComboBonusPerGem" => &mut self.combo_bonus_per_gem,
            "EnemyMinDamage" => &mut self.enemy_min_damage,
            "EnemyMaxDamage" => &mut self.enemy_max_damage,
            "MaxShieldAmount" => &mut self.max_shield_amount,
            "HealPerWhiteGem" => &mut self.heal_per_white_gem,
            "ShieldPerGreenGem" => &mut self.shield_per_green_gem,
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        };
        *field = parsed;
        Ok(())
    }
}
