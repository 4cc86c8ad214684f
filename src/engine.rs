//! Engine state management.
//!
//! Holds the base configuration, the option overrides set by the driver, the
//! level's goals-remaining signal, and the battle in progress. Each handler
//! writes its protocol response to the given writer.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::combat::{CombatConfig, ConfigError, GemClear, TurnPhase, OPTIONS};
use crate::protocol::{format_enemy_attack, format_player_attack};
use crate::session::Combat;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub combat: Option<Combat>,
    pub base_config: CombatConfig,
    pub options: HashMap<String, String>,
    goals_remaining: u32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with the default configuration and no battle.
    pub fn new() -> Self {
        Engine {
            combat: None,
            base_config: CombatConfig::default(),
            options: HashMap::new(),
            goals_remaining: 0,
        }
    }

    /// Sets an engine option. Takes effect at the next `newcombat`.
    ///
    /// Unknown names and values outside the option's range are dropped, so
    /// an earlier good value stays in force.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        let value = value.unwrap_or_default();
        if let Err(e) = CombatConfig::default().set_option(&name, &value) {
            warn!("ignoring setoption: {}", e);
            return;
        }
        self.options.insert(name, value);
    }

    /// Replaces the base configuration with one loaded from a JSON file.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.base_config = CombatConfig::load(path)?;
        info!(path = %path.display(), "loaded combat config");
        Ok(())
    }

    /// Handles `config <path>`. Silent on success.
    pub fn handle_config<W: Write>(&mut self, path: &str, out: &mut W) -> io::Result<()> {
        match self.load_config(path) {
            Ok(()) => Ok(()),
            Err(e) => report_error(out, &e),
        }
    }

    /// Returns the base configuration with all option overrides applied.
    pub fn effective_config(&self) -> Result<CombatConfig, ConfigError> {
        let mut config = self.base_config;
        for (name, value) in &self.options {
            config.set_option(name, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Updates the goals-remaining signal for the current and future battles.
    pub fn set_goals(&mut self, remaining: u32) {
        self.goals_remaining = remaining;
        if let Some(combat) = self.combat.as_mut() {
            combat.set_goals_remaining(remaining);
        }
    }

    /// Handles the GCI handshake: writes id, options, and gciok.
    pub fn handle_gci<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name gemclash")?;
        writeln!(out, "id author gemclash")?;
        let defaults = CombatConfig::default();
        for opt in OPTIONS.iter() {
            writeln!(
                out,
                "option name {} type spin default {} min {} max {}",
                opt.name,
                defaults.option(opt.name).unwrap_or(opt.min),
                opt.min,
                opt.max
            )?;
        }
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "gciok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `newcombat`: builds the effective config and starts a battle.
    pub fn handle_newcombat<W: Write>(&mut self, seed: Option<u64>, out: &mut W) -> io::Result<()> {
        let config = match self.effective_config() {
            Ok(c) => c,
            Err(e) => return report_error(out, &e),
        };
        match Combat::new(config, seed.unwrap_or(0)) {
            Ok(mut combat) => {
                combat.set_goals_remaining(self.goals_remaining);
                let state = *combat.state();
                self.combat = Some(combat);
                writeln!(
                    out,
                    "combat started player {} enemy {}",
                    state.player_health, state.enemy_health
                )?;
                out.flush()
            }
            Err(e) => report_error(out, &e),
        }
    }

    /// Handles `intent`: rolls the enemy's next attack ahead of time.
    pub fn handle_intent<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(combat) = self.combat.as_mut() else {
            return report_error(out, &"no combat in progress");
        };
        match combat.telegraph() {
            Ok(damage) => {
                writeln!(out, "intent {}", damage)?;
                out.flush()
            }
            Err(e) => report_error(out, &e),
        }
    }

    /// Handles `attack`: resolves the player's match.
    pub fn handle_attack<W: Write>(&mut self, gems: GemClear, out: &mut W) -> io::Result<()> {
        let Some(combat) = self.combat.as_mut() else {
            return report_error(out, &"no combat in progress");
        };
        match combat.player_attack(gems) {
            Ok(attack) => {
                writeln!(
                    out,
                    "{}",
                    format_player_attack(&attack, combat.state(), combat.config())
                )?;
                write_result(out, combat.phase())?;
                out.flush()
            }
            Err(e) => report_error(out, &e),
        }
    }

    /// Handles `enemy`: resolves the enemy's attack.
    pub fn handle_enemy<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(combat) = self.combat.as_mut() else {
            return report_error(out, &"no combat in progress");
        };
        match combat.enemy_attack() {
            Ok(attack) => {
                writeln!(
                    out,
                    "{}",
                    format_enemy_attack(&attack, combat.state(), combat.config())
                )?;
                write_result(out, combat.phase())?;
                out.flush()
            }
            Err(e) => report_error(out, &e),
        }
    }

    /// Handles `state`: writes the current snapshot as JSON.
    pub fn handle_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(combat) = self.combat.as_ref() else {
            return report_error(out, &"no combat in progress");
        };
        let json = combat.snapshot().to_json().map_err(io::Error::other)?;
        writeln!(out, "state {}", json)?;
        out.flush()
    }
}

/// Writes `result victory` or `result defeat` once a battle is decided.
fn write_result<W: Write>(out: &mut W, phase: TurnPhase) -> io::Result<()> {
    if phase.is_terminal() {
        writeln!(out, "result {}", phase)?;
    }
    Ok(())
}

/// Reports a failed command to the driver and the log.
fn report_error<W: Write>(out: &mut W, err: &dyn std::fmt::Display) -> io::Result<()> {
    warn!("{}", err);
    writeln!(out, "error {}", err)?;
    out.flush()
}
