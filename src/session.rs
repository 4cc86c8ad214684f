//! Combat session.
//!
//! A `Combat` owns one battle: its configuration and state, the
//! goals-remaining signal from the level, the random source for enemy
//! damage, and the observers that presentation code registers. It enforces
//! the turn order, so at most one attack resolves at a time and attacks
//! after the battle is decided are refused.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::combat::{CombatConfig, CombatError, CombatState, GemClear, TurnPhase};
use crate::resolve::{
    is_combat_over, phase, resolve_enemy_attack_with_damage, resolve_player_attack, roll_enemy_damage,
    EnemyAttack, PlayerAttack,
};
use crate::snapshot::CombatSnapshot;

/// Something that happened in a battle, delivered to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// The battle was (re)started.
    Reset(CombatSnapshot),
    /// The enemy's next attack was rolled ahead of time.
    EnemyIntent(u32),
    PlayerAttacked {
        attack: PlayerAttack,
        snapshot: CombatSnapshot,
    },
    EnemyAttacked {
        attack: EnemyAttack,
        snapshot: CombatSnapshot,
    },
    /// The battle was decided; carries `Victory` or `Defeat`.
    Ended(TurnPhase),
}

/// Handle returned by [`Combat::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&CombatEvent) + Send>;

/// One battle in progress.
pub struct Combat {
    config: CombatConfig,
    state: CombatState,
    goals_remaining: u32,
    intent: Option<u32>,
    rng: SmallRng,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl Combat {
    /// Starts a battle at full health. A zero seed draws from entropy.
    pub fn new(config: CombatConfig, seed: u64) -> Result<Self, CombatError> {
        let state = CombatState::new(&config);
        Self::from_state(config, state, seed)
    }

    /// Resumes a battle from an existing state.
    pub fn from_state(
        config: CombatConfig,
        state: CombatState,
        seed: u64,
    ) -> Result<Self, CombatError> {
        config.validate()?;
        if !state.is_within(&config) {
            return Err(CombatError::InvalidArgument(format!(
                "state {:?} exceeds configured maxima",
                state
            )));
        }
        let rng = if seed != 0 {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_entropy()
        };
        Ok(Combat {
            config,
            state,
            goals_remaining: 0,
            intent: None,
            rng,
            observers: Vec::new(),
            next_observer: 0,
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        phase(&self.state)
    }

    /// The deciding phase once either side has fallen.
    pub fn is_over(&self) -> Option<TurnPhase> {
        is_combat_over(&self.state)
    }

    pub fn goals_remaining(&self) -> u32 {
        self.goals_remaining
    }

    /// Updates the level's goals-remaining count. While it is non-zero the
    /// enemy cannot be finished off.
    pub fn set_goals_remaining(&mut self, goals: u32) {
        self.goals_remaining = goals;
    }

    /// The telegraphed damage of the enemy's next attack, if rolled.
    pub fn intent(&self) -> Option<u32> {
        self.intent
    }

    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot::new(&self.state, &self.config, self.goals_remaining, self.intent)
    }

    /// Registers an observer. It stays registered across resets until
    /// [`Combat::unsubscribe`] is called or the session is dropped.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&CombatEvent) + Send + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// Restarts the battle at full health. Observers and the goals signal
    /// are kept.
    pub fn reset(&mut self) {
        self.state = CombatState::new(&self.config);
        self.intent = None;
        let snapshot = self.snapshot();
        self.emit(CombatEvent::Reset(snapshot));
    }

    /// Rolls the enemy's next attack ahead of time so it can be shown during
    /// the player's turn. Repeated calls return the same value until the
    /// enemy attacks.
    pub fn telegraph(&mut self) -> Result<u32, CombatError> {
        if let Some(decided) = self.is_over() {
            return Err(CombatError::CombatOver(decided));
        }
        if let Some(damage) = self.intent {
            return Ok(damage);
        }
        let damage = roll_enemy_damage(&self.config, &mut self.rng)?;
        self.intent = Some(damage);
        self.emit(CombatEvent::EnemyIntent(damage));
        Ok(damage)
    }

    /// Resolves the player's match against the enemy.
    pub fn player_attack(&mut self, gems: GemClear) -> Result<PlayerAttack, CombatError> {
        self.expect_phase(TurnPhase::PlayerTurn)?;
        let (next, attack) =
            resolve_player_attack(&self.state, &self.config, gems, self.goals_remaining)?;
        self.state = next;

        let snapshot = self.snapshot();
        self.emit(CombatEvent::PlayerAttacked { attack, snapshot });
        self.check_ended();
        Ok(attack)
    }

    /// Resolves the enemy's attack, using the telegraphed damage if one was
    /// rolled.
    pub fn enemy_attack(&mut self) -> Result<EnemyAttack, CombatError> {
        self.expect_phase(TurnPhase::EnemyTurn)?;
        let damage = match self.intent {
            Some(d) => d,
            None => roll_enemy_damage(&self.config, &mut self.rng)?,
        };
        let (next, attack) = resolve_enemy_attack_with_damage(&self.state, &self.config, damage)?;
        self.state = next;
        self.intent = None;

        let snapshot = self.snapshot();
        self.emit(CombatEvent::EnemyAttacked { attack, snapshot });
        self.check_ended();
        Ok(attack)
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<(), CombatError> {
        if let Some(decided) = self.is_over() {
            return Err(CombatError::CombatOver(decided));
        }
        let actual = self.phase();
        if actual != expected {
            return Err(CombatError::OutOfTurn { expected, actual });
        }
        Ok(())
    }

    fn check_ended(&mut self) {
        if let Some(decided) = self.is_over() {
            info!(
                result = %decided,
                player_health = self.state.player_health,
                enemy_health = self.state.enemy_health,
                "combat ended"
            );
            self.intent = None;
            self.emit(CombatEvent::Ended(decided));
        }
    }

    fn emit(&mut self, event: CombatEvent) {
        debug!(observers = self.observers.len(), ?event, "combat event");
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Outcome;
    use std::sync::{Arc, Mutex};

    fn fixed_damage_config(damage: u32) -> CombatConfig {
        CombatConfig {
            enemy_min_damage: damage,
            enemy_max_damage: damage,
            ..CombatConfig::default()
        }
    }

    fn recorder(combat: &mut Combat) -> (ObserverId, Arc<Mutex<Vec<CombatEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = combat.subscribe(move |e| sink.lock().unwrap().push(e.clone()));
        (id, events)
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = CombatConfig {
            player_max_health: 0,
            ..CombatConfig::default()
        };
        assert!(Combat::new(config, 1).is_err());
    }

    #[test]
    fn from_state_rejects_out_of_bounds_state() {
        let config = CombatConfig::default();
        let mut state = CombatState::new(&config);
        state.player_health = config.player_max_health + 1;
        assert!(Combat::from_state(config, state, 1).is_err());
    }

    #[test]
    fn turns_alternate() {
        let mut combat = Combat::new(fixed_damage_config(10), 1).unwrap();
        assert_eq!(combat.phase(), TurnPhase::PlayerTurn);
        combat.player_attack(GemClear::plain(3)).unwrap();
        assert_eq!(combat.phase(), TurnPhase::EnemyTurn);
        let attack = combat.enemy_attack().unwrap();
        assert_eq!(attack.damage, 10);
        assert_eq!(combat.phase(), TurnPhase::PlayerTurn);
        assert_eq!(combat.state().player_health, 90);
    }

    #[test]
    fn out_of_turn_attacks_rejected_without_change() {
        let mut combat = Combat::new(CombatConfig::default(), 1).unwrap();
        let before = *combat.state();
        let err = combat.enemy_attack().unwrap_err();
        assert_eq!(
            err,
            CombatError::OutOfTurn {
                expected: TurnPhase::EnemyTurn,
                actual: TurnPhase::PlayerTurn,
            }
        );
        assert_eq!(*combat.state(), before);

        combat.player_attack(GemClear::plain(3)).unwrap();
        assert!(matches!(
            combat.player_attack(GemClear::plain(3)),
            Err(CombatError::OutOfTurn { .. })
        ));
    }

    #[test]
    fn invalid_gems_leave_state_unchanged() {
        let mut combat = Combat::new(CombatConfig::default(), 1).unwrap();
        let before = *combat.state();
        assert!(combat.player_attack(GemClear::new(1, 1, 1)).is_err());
        assert_eq!(*combat.state(), before);
        assert_eq!(combat.phase(), TurnPhase::PlayerTurn);
    }

    #[test]
    fn victory_ends_combat() {
        let mut combat = Combat::new(CombatConfig::default(), 1).unwrap();
        let (_, events) = recorder(&mut combat);
        assert_eq!(combat.is_over(), None);
        let attack = combat.player_attack(GemClear::plain(20)).unwrap();
        assert_eq!(attack.outcome, Outcome::Lethal);
        assert_eq!(combat.phase(), TurnPhase::Victory);
        assert_eq!(combat.is_over(), Some(TurnPhase::Victory));
        assert!(combat.state().is_player_turn);
        assert_eq!(
            combat.player_attack(GemClear::plain(3)),
            Err(CombatError::CombatOver(TurnPhase::Victory))
        );
        assert_eq!(combat.telegraph(), Err(CombatError::CombatOver(TurnPhase::Victory)));

        let events = events.lock().unwrap();
        assert!(matches!(events[0], CombatEvent::PlayerAttacked { .. }));
        assert_eq!(events[1], CombatEvent::Ended(TurnPhase::Victory));
    }

    #[test]
    fn health_lock_prevents_victory_until_goals_done() {
        let mut combat = Combat::new(fixed_damage_config(1), 1).unwrap();
        combat.set_goals_remaining(3);
        combat.player_attack(GemClear::plain(20)).unwrap();
        assert_eq!(combat.state().enemy_health, 1);
        assert_eq!(combat.phase(), TurnPhase::EnemyTurn);
        assert!(combat.snapshot().health_locked);

        combat.enemy_attack().unwrap();
        combat.set_goals_remaining(0);
        let attack = combat.player_attack(GemClear::plain(3)).unwrap();
        assert_eq!(attack.outcome, Outcome::Lethal);
        assert_eq!(combat.phase(), TurnPhase::Victory);
    }

    #[test]
    fn defeat_ends_combat() {
        let config = fixed_damage_config(60);
        let mut combat = Combat::new(config, 1).unwrap();
        combat.set_goals_remaining(1);
        combat.player_attack(GemClear::plain(1)).unwrap();
        combat.enemy_attack().unwrap();
        combat.player_attack(GemClear::plain(1)).unwrap();
        let attack = combat.enemy_attack().unwrap();
        assert_eq!(attack.outcome, Outcome::Lethal);
        assert_eq!(combat.phase(), TurnPhase::Defeat);
        assert_eq!(combat.is_over(), Some(TurnPhase::Defeat));
        assert!(!combat.state().is_player_turn);
        assert_eq!(
            combat.enemy_attack(),
            Err(CombatError::CombatOver(TurnPhase::Defeat))
        );
    }

    #[test]
    fn telegraphed_damage_is_used_by_the_attack() {
        let mut combat = Combat::new(CombatConfig::default(), 99).unwrap();
        let (_, events) = recorder(&mut combat);
        let intent = combat.telegraph().unwrap();
        assert_eq!(combat.telegraph().unwrap(), intent, "intent is stable");
        assert_eq!(combat.snapshot().enemy_intent, Some(intent));

        combat.player_attack(GemClear::plain(3)).unwrap();
        let attack = combat.enemy_attack().unwrap();
        assert_eq!(attack.damage, intent);
        assert_eq!(combat.intent(), None);

        let events = events.lock().unwrap();
        assert_eq!(events[0], CombatEvent::EnemyIntent(intent));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut combat = Combat::new(CombatConfig::default(), 1).unwrap();
        let (id, events) = recorder(&mut combat);
        combat.player_attack(GemClear::plain(3)).unwrap();
        assert!(combat.unsubscribe(id));
        assert!(!combat.unsubscribe(id));
        combat.enemy_attack().unwrap();
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn reset_restores_full_health_and_keeps_observers() {
        let mut combat = Combat::new(fixed_damage_config(10), 1).unwrap();
        let (_, events) = recorder(&mut combat);
        combat.player_attack(GemClear::new(4, 1, 1)).unwrap();
        combat.enemy_attack().unwrap();
        combat.reset();
        assert_eq!(*combat.state(), CombatState::new(combat.config()));
        assert!(matches!(
            events.lock().unwrap().last(),
            Some(CombatEvent::Reset(_))
        ));
    }

    #[test]
    fn same_seed_same_battle() {
        let play = |seed| {
            let mut combat = Combat::new(CombatConfig::default(), seed).unwrap();
            let mut log = Vec::new();
            for _ in 0..3 {
                combat.player_attack(GemClear::plain(1)).unwrap();
                log.push(combat.enemy_attack().unwrap().damage);
            }
            log
        };
        assert_eq!(play(1234), play(1234));
    }
}
