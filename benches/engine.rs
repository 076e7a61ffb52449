use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::{find_all_matches, find_legal_move, rank_moves, Engine, Grid, SimpleRng, SpecialResolver};
use tui_match3::types::{EngineConfig, TileColor};

fn dealt_grid() -> Grid {
    let mut next_id = 1;
    Grid::generate(8, 8, &TileColor::ALL[..6], &mut SimpleRng::new(12345), &mut next_id)
}

fn bench_match_scan(c: &mut Criterion) {
    let grid = dealt_grid();

    c.bench_function("find_all_matches_8x8", |b| {
        b.iter(|| find_all_matches(black_box(&grid)))
    });
}

fn bench_legal_move_search(c: &mut Criterion) {
    let grid = dealt_grid();

    c.bench_function("find_legal_move_8x8", |b| {
        b.iter(|| find_legal_move(black_box(&grid)))
    });
}

fn bench_rank_moves(c: &mut Criterion) {
    let grid = dealt_grid();
    let resolver = SpecialResolver::new(&EngineConfig::default());

    c.bench_function("rank_moves_8x8", |b| {
        b.iter(|| rank_moves(black_box(&grid), &resolver))
    });
}

fn bench_turn(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::default().with_seed(12345)).unwrap();

    c.bench_function("hinted_turn", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            if let Some((from, to)) = engine.hint() {
                black_box(engine.request_swap(from, to));
            }
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::default().with_seed(12345)).unwrap();

    c.bench_function("engine_tick_16ms", |b| {
        b.iter(|| {
            engine.tick(black_box(16));
        })
    });
}

criterion_group!(
    benches,
    bench_match_scan,
    bench_legal_move_search,
    bench_rank_moves,
    bench_turn,
    bench_tick
);
criterion_main!(benches);
