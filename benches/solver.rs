//! Benchmarks for the puzzle models and the search engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use scramble_solver::cube::{Cube, CubeMove};
use scramble_solver::solver::solve;
use scramble_solver::state::PuzzleState;
use scramble_solver::tile::TilePuzzle;

/// Benchmark successor generation for a mid-search tile grid.
fn bench_tile_successors(c: &mut Criterion) {
    let puzzle = TilePuzzle::random(4, &mut SmallRng::seed_from_u64(1)).unwrap();

    c.bench_function("tile_successors", |b| {
        b.iter(|| black_box(&puzzle).successors())
    });
}

/// Benchmark the Manhattan-distance heuristic.
fn bench_tile_heuristic(c: &mut Criterion) {
    let puzzle = TilePuzzle::random(4, &mut SmallRng::seed_from_u64(1)).unwrap();

    c.bench_function("tile_heuristic", |b| b.iter(|| black_box(&puzzle).heuristic()));
}

/// Benchmark a full quarter-turn on an order-3 cube.
fn bench_cube_apply(c: &mut Criterion) {
    let (cube, _) = Cube::scramble(3, 10, &mut SmallRng::seed_from_u64(2)).unwrap();
    let mv = CubeMove::ALL[0];

    c.bench_function("cube_apply", |b| b.iter(|| black_box(&cube).apply(mv)));
}

/// Benchmark solving a random 3x3 tile instance end to end.
fn bench_solve_tile(c: &mut Criterion) {
    let puzzle = TilePuzzle::random(3, &mut SmallRng::seed_from_u64(3)).unwrap();

    let mut group = c.benchmark_group("solve");
    group.sample_size(20);
    group.bench_function("tile_3x3", |b| {
        b.iter(|| solve(black_box(&puzzle)).unwrap())
    });
    group.finish();
}

/// Benchmark solving a short pocket-cube scramble.
fn bench_solve_cube(c: &mut Criterion) {
    let (cube, _) = Cube::scramble(2, 4, &mut SmallRng::seed_from_u64(4)).unwrap();

    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    group.bench_function("cube_2x2_scramble_4", |b| {
        b.iter(|| solve(black_box(&cube)).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_tile_successors,
    bench_tile_heuristic,
    bench_cube_apply,
    bench_solve_tile,
    bench_solve_cube
);
criterion_main!(benches);
