//! Benchmark for whole games and for round scoring
//!
//! Plays seeded random games to the end with RandomSuggester.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mosaic_engine::{Game, MoveSuggester, Phase, RandomSuggester, RuleOptions};

fn play_to_end(seed: u64, players: usize) -> Game {
    let names = (0..players).map(|i| format!("P{i}"));
    let mut game = Game::with_rng(names, RuleOptions::default(), StdRng::seed_from_u64(seed))
        .expect("valid player count");
    let mut suggester = RandomSuggester::new(seed);

    loop {
        match game.phase() {
            Phase::GameOver => return game,
            Phase::RoundEnd => {
                game.next_round().expect("round scores");
            }
            _ => {
                let suggestion = suggester.suggest(&game).expect("legal move");
                game.apply_suggestion(&suggestion).expect("suggestion applies");
            }
        }
    }
}

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    for players in [2, 3, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(players),
            &players,
            |b, &players| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed += 1;
                    black_box(play_to_end(seed, players))
                })
            },
        );
    }

    group.finish();
}

fn bench_legal_moves(c: &mut Criterion) {
    let game = Game::with_rng(["a", "b"], RuleOptions::default(), StdRng::seed_from_u64(42))
        .expect("valid player count");

    c.bench_function("legal_moves_opening", |b| {
        b.iter(|| black_box(game.legal_moves()))
    });
}

criterion_group!(benches, bench_full_game, bench_legal_moves);
criterion_main!(benches);
