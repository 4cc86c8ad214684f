use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use gemclash::combat::{CombatConfig, CombatState, GemClear};
use gemclash::protocol::parse_command;
use gemclash::resolve::{resolve_enemy_attack, resolve_player_attack};
use gemclash::session::Combat;
use gemclash::simulate::{play_battle, SimulationConfig};

fn bench_player_attack(c: &mut Criterion) {
    let config = CombatConfig::default();
    let state = CombatState::new(&config);
    let gems = GemClear::new(6, 1, 1);
    c.bench_function("resolve_player_attack", |b| {
        b.iter(|| resolve_player_attack(black_box(&state), black_box(&config), gems, 1))
    });
}

fn bench_enemy_attack(c: &mut Criterion) {
    let config = CombatConfig::default();
    let mut state = CombatState::new(&config);
    state.is_player_turn = false;
    state.pending_shield = 10;
    state.pending_heal = 10;
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("resolve_enemy_attack", |b| {
        b.iter(|| resolve_enemy_attack(black_box(&state), black_box(&config), &mut rng))
    });
}

fn bench_session_turn(c: &mut Criterion) {
    c.bench_function("session_full_turn", |b| {
        let mut combat = Combat::new(CombatConfig::default(), 9).unwrap();
        combat.set_goals_remaining(1);
        b.iter(|| {
            if combat.phase().is_terminal() {
                combat.reset();
            }
            combat.telegraph().unwrap();
            combat.player_attack(black_box(GemClear::new(4, 1, 1))).unwrap();
            combat.enemy_attack().unwrap()
        })
    });
}

fn bench_parse_attack(c: &mut Criterion) {
    c.bench_function("parse_attack_command", |b| {
        b.iter(|| parse_command(black_box("attack 7 white 2 green 1")))
    });
}

fn bench_simulated_battle(c: &mut Criterion) {
    let config = SimulationConfig {
        quiet: true,
        ..SimulationConfig::default()
    };
    let mut rng = SmallRng::seed_from_u64(3);
    c.bench_function("simulated_battle", |b| {
        b.iter(|| play_battle(black_box(&config), 0, &mut rng).unwrap())
    });
}

criterion_group!(
    benches,
    bench_player_attack,
    bench_enemy_attack,
    bench_session_turn,
    bench_parse_attack,
    bench_simulated_battle,
);
criterion_main!(benches);
