//! MCTS benchmarks for performance profiling.
//!
//! Run with: `cargo bench -p mcts`
//!
//! These benchmarks measure:
//! - Full search with varying iteration counts
//! - Search from different game phases (opening, late game)
//! - Playout policy and reshuffle interval variants
//! - Tree operations (selection, backpropagation)

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engine_core::{ActionCodec, ActionId, Position, RuleEngine};
use games_voyage::{RulesConfig, Voyage};
use hex_grid::HexGrid;
use mcts::{MctsConfig, MctsSearch, MctsTree, PlayoutKind};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn setup() -> (Voyage, ActionCodec) {
    let grid = Arc::new(HexGrid::generate().unwrap());
    (
        Voyage::new(grid.clone(), RulesConfig::default()),
        ActionCodec::new(grid),
    )
}

/// Position after `turns` random legal actions from a fresh game.
fn play_random(voyage: &Voyage, codec: &ActionCodec, seed: u64, turns: usize) -> Position {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut position = voyage.new_game(&mut rng).unwrap();
    for _ in 0..turns {
        if voyage.terminal_score(&position).is_some() {
            break;
        }
        let legal = codec.legality_mask(&position).legal_ids();
        let id = *legal.choose(&mut rng).unwrap();
        let mv = codec.decode(id, &position).unwrap();
        position = voyage.apply(&position, &mv, &mut rng).unwrap();
    }
    position
}

fn run_search(voyage: &Voyage, codec: &ActionCodec, config: MctsConfig, position: &Position) {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut search = MctsSearch::new(voyage, codec, config, position).unwrap();
    black_box(search.run(&mut rng).unwrap());
}

// =============================================================================
// Full MCTS Search Benchmarks
// =============================================================================

fn bench_mcts_search_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_search_iterations");
    let (voyage, codec) = setup();
    let position = play_random(&voyage, &codec, 1, 0);

    for iterations in [50, 100, 200, 400] {
        group.throughput(Throughput::Elements(iterations as u64));
        group.bench_with_input(
            BenchmarkId::new("voyage", iterations),
            &iterations,
            |b, &iterations| {
                let config = MctsConfig::default().with_iterations(iterations);
                b.iter(|| run_search(&voyage, &codec, config.clone(), &position));
            },
        );
    }

    group.finish();
}

fn bench_mcts_game_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_game_phases");
    let (voyage, codec) = setup();
    let config = MctsConfig::default().with_iterations(200);

    let opening = play_random(&voyage, &codec, 2, 0);
    group.bench_function("opening", |b| {
        b.iter(|| run_search(&voyage, &codec, config.clone(), &opening));
    });

    let late = play_random(&voyage, &codec, 2, 15);
    group.bench_function("late", |b| {
        b.iter(|| run_search(&voyage, &codec, config.clone(), &late));
    });

    group.finish();
}

fn bench_mcts_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_configs");
    let (voyage, codec) = setup();
    let position = play_random(&voyage, &codec, 3, 4);
    let base = MctsConfig::default().with_iterations(200);

    group.bench_function("greedy_playout", |b| {
        let config = base
            .clone()
            .with_playout(PlayoutKind::Greedy { epsilon: 0.1 });
        b.iter(|| run_search(&voyage, &codec, config.clone(), &position));
    });

    for k in [1u32, 20, 200] {
        group.bench_with_input(BenchmarkId::new("reshuffle_interval", k), &k, |b, &k| {
            let config = base.clone().with_reshuffle_interval(k);
            b.iter(|| run_search(&voyage, &codec, config.clone(), &position));
        });
    }

    group.finish();
}

// =============================================================================
// Tree Operation Benchmarks
// =============================================================================

fn bench_tree_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mcts_tree_ops");
    let (voyage, codec) = setup();
    let position = play_random(&voyage, &codec, 4, 0);

    group.bench_function("select_child_32", |b| {
        let mut tree = MctsTree::new(position.clone(), Vec::new());
        for i in 0..32u32 {
            let child = tree.add_child(tree.root(), ActionId(i), position.clone(), None, Vec::new());
            for _ in 0..=(i % 5) {
                tree.backpropagate(child, (i % 3) as f32 / 2.0);
            }
        }
        b.iter(|| black_box(tree.select_child(tree.root(), 1.41)));
    });

    group.bench_function("backpropagate_depth_8", |b| {
        let mut tree = MctsTree::new(position.clone(), Vec::new());
        let mut leaf = tree.root();
        for i in 0..8u32 {
            leaf = tree.add_child(leaf, ActionId(i), position.clone(), None, Vec::new());
        }
        b.iter(|| tree.backpropagate(black_box(leaf), 0.5));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mcts_search_iterations,
    bench_mcts_game_phases,
    bench_mcts_configs,
    bench_tree_operations,
);
criterion_main!(benches);
