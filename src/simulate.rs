//! Batch battle simulation for balancing.
//!
//! Plays many battles with randomly drawn gem clears against one
//! configuration and records how each ended. Level goals count down one per
//! player turn, so the health lock holds for the first `goal_turns` turns.
//! Battles can run on a rayon pool; with a fixed seed the records are the
//! same whatever the thread count.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::combat::{CombatConfig, CombatError, GemClear, TurnPhase};
use crate::session::Combat;

/// Errors that can stop a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of battles to play.
    pub num_battles: usize,
    pub combat: CombatConfig,
    /// Smallest match the simulated player makes.
    pub min_gems: u32,
    /// Largest match the simulated player makes.
    pub max_gems: u32,
    /// Chance that any cleared gem is white or green (split evenly).
    pub special_gem_chance: f64,
    /// Player turns before the level goals are complete.
    pub goal_turns: u32,
    /// Turn limit after which a battle counts as a timeout.
    pub max_turns: u32,
    /// Number of parallel threads.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-battle progress output.
    pub quiet: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_battles: 100,
            combat: CombatConfig::default(),
            min_gems: 3,
            max_gems: 7,
            special_gem_chance: 0.2,
            goal_turns: 3,
            max_turns: 200,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), CombatError> {
        self.combat.validate()?;
        if self.min_gems > self.max_gems {
            return Err(CombatError::InvalidArgument(format!(
                "gem range is empty: min {} > max {}",
                self.min_gems, self.max_gems
            )));
        }
        if !(0.0..=1.0).contains(&self.special_gem_chance) {
            return Err(CombatError::InvalidArgument(format!(
                "special gem chance {} outside 0..=1",
                self.special_gem_chance
            )));
        }
        if self.max_turns == 0 {
            return Err(CombatError::InvalidArgument(
                "max turns must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a simulated battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleResult {
    Victory,
    Defeat,
    Timeout,
}

/// A complete simulated battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BattleRecord {
    pub battle_id: usize,
    pub result: BattleResult,
    /// Player turns taken.
    pub turns: u32,
    pub final_player_health: u32,
    pub final_enemy_health: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub damage_blocked: u32,
    pub healed: u32,
}

/// Aggregate figures over a set of battles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub battles: usize,
    pub victories: usize,
    pub defeats: usize,
    pub timeouts: usize,
    pub win_rate: f64,
    pub mean_turns: f64,
}

/// Draws one random gem clear.
fn random_clear(config: &SimulationConfig, rng: &mut SmallRng) -> GemClear {
    let cleared = rng.gen_range(config.min_gems..=config.max_gems);
    let mut gems = GemClear::plain(cleared);
    for _ in 0..cleared {
        if rng.gen_bool(config.special_gem_chance) {
            if rng.gen_bool(0.5) {
                gems.white += 1;
            } else {
                gems.green += 1;
            }
        }
    }
    gems
}

/// Plays a single battle to completion or the turn limit.
pub fn play_battle(
    config: &SimulationConfig,
    battle_id: usize,
    rng: &mut SmallRng,
) -> Result<BattleRecord, CombatError> {
    let mut combat = Combat::new(config.combat, rng.gen_range(1..=u64::MAX))?;
    let mut record = BattleRecord {
        battle_id,
        result: BattleResult::Timeout,
        turns: 0,
        final_player_health: 0,
        final_enemy_health: 0,
        damage_dealt: 0,
        damage_taken: 0,
        damage_blocked: 0,
        healed: 0,
    };

    let mut goals = config.goal_turns;
    while record.turns < config.max_turns {
        combat.set_goals_remaining(goals);
        combat.telegraph()?;

        let attack = combat.player_attack(random_clear(config, rng))?;
        record.turns += 1;
        record.damage_dealt = record.damage_dealt.saturating_add(attack.dealt);
        goals = goals.saturating_sub(1);
        if combat.is_over().is_some() {
            break;
        }

        let attack = combat.enemy_attack()?;
        record.damage_taken = record.damage_taken.saturating_add(attack.actual_damage);
        record.damage_blocked = record.damage_blocked.saturating_add(attack.shield_used);
        record.healed = record.healed.saturating_add(attack.heal_applied);
        if combat.is_over().is_some() {
            break;
        }
    }

    record.result = match combat.is_over() {
        Some(TurnPhase::Victory) => BattleResult::Victory,
        Some(_) => BattleResult::Defeat,
        None => BattleResult::Timeout,
    };
    record.final_player_health = combat.state().player_health;
    record.final_enemy_health = combat.state().enemy_health;
    debug!(battle_id, result = ?record.result, turns = record.turns, "battle finished");
    Ok(record)
}

/// Runs a simulation, returning every battle record in id order.
pub fn run_simulation(config: &SimulationConfig) -> Result<Vec<BattleRecord>, SimulationError> {
    let mut battles = Vec::with_capacity(config.num_battles);
    run_simulation_with_callback(config, |battle| battles.push(battle))?;
    Ok(battles)
}

/// Runs a simulation, calling `on_battle` with each record in id order.
pub fn run_simulation_with_callback<F>(
    config: &SimulationConfig,
    on_battle: F,
) -> Result<(), SimulationError>
where
    F: FnMut(BattleRecord),
{
    config.validate()?;
    if config.threads > 1 {
        run_parallel(config, on_battle)
    } else {
        run_sequential(config, on_battle)
    }
}

/// Random source for one battle. Seeded runs derive a stream per battle so
/// thread count does not change the results.
fn battle_rng(seed: u64, battle_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(battle_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn log_progress(config: &SimulationConfig, n: usize, battle: &BattleRecord) {
    if !config.quiet {
        info!(
            "Battle {}/{}: {:?} after {} turns",
            n, config.num_battles, battle.result, battle.turns
        );
    }
}

/// Sequential simulation: plays battles one at a time.
fn run_sequential<F>(config: &SimulationConfig, mut on_battle: F) -> Result<(), SimulationError>
where
    F: FnMut(BattleRecord),
{
    for i in 0..config.num_battles {
        let mut rng = battle_rng(config.seed, i);
        let battle = play_battle(config, i, &mut rng)?;
        log_progress(config, i + 1, &battle);
        on_battle(battle);
    }
    Ok(())
}

/// Parallel simulation: plays battles concurrently on a rayon pool.
fn run_parallel<F>(config: &SimulationConfig, mut on_battle: F) -> Result<(), SimulationError>
where
    F: FnMut(BattleRecord),
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let completed = AtomicUsize::new(0);

    let battles: Vec<Result<BattleRecord, CombatError>> = pool.install(|| {
        (0..config.num_battles)
            .into_par_iter()
            .map(|i| -> Result<BattleRecord, CombatError> {
                let mut rng = battle_rng(config.seed, i);
                let battle = play_battle(config, i, &mut rng)?;
                let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log_progress(config, n, &battle);
                Ok(battle)
            })
            .collect()
    });

    for battle in battles {
        on_battle(battle?);
    }
    Ok(())
}

/// Writes battle records as JSONL (one JSON object per battle, one per line).
pub fn write_jsonl<W: Write>(battles: &[BattleRecord], out: &mut W) -> std::io::Result<()> {
    for battle in battles {
        serde_json::to_writer(&mut *out, battle)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Computes win rate and mean length over a set of battles.
pub fn summarize(battles: &[BattleRecord]) -> Summary {
    let count = |r: BattleResult| battles.iter().filter(|b| b.result == r).count();
    let victories = count(BattleResult::Victory);
    let total_turns: u64 = battles.iter().map(|b| b.turns as u64).sum();
    let n = battles.len();
    Summary {
        battles: n,
        victories,
        defeats: count(BattleResult::Defeat),
        timeouts: count(BattleResult::Timeout),
        win_rate: if n == 0 { 0.0 } else { victories as f64 / n as f64 },
        mean_turns: if n == 0 { 0.0 } else { total_turns as f64 / n as f64 },
    }
}
