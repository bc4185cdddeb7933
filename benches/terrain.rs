//! Benchmarks for island generation, the work done on every island change.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ladybug_isles::{
    default_islands, edge_blend, BiomeGrid, GameConfig, GameSession, Generator,
    IslandTerrainGenerator, TerrainConfig,
};

fn bench_classify_grid(c: &mut Criterion) {
    let config = TerrainConfig::new();

    c.bench_function("classify_20x12", |b| {
        b.iter(|| BiomeGrid::classify(black_box(20), black_box(12), black_box(0x1a2b_3c4d), &config));
    });
}

fn bench_generate_island(c: &mut Criterion) {
    let generator = IslandTerrainGenerator::new(TerrainConfig::new(), 0);
    let islands = default_islands();

    c.bench_function("generate_and_validate_island", |b| {
        b.iter(|| {
            let grid = generator.generate(black_box(&islands[0])).unwrap();
            generator.validate(&grid, &islands[0]).unwrap();
            black_box(grid)
        });
    });
}

fn bench_edge_blend(c: &mut Criterion) {
    let grid = BiomeGrid::classify(20, 12, 0x5e6f_7081, &TerrainConfig::new());

    c.bench_function("edge_blend_full_grid", |b| {
        b.iter(|| {
            let mut blends = 0;
            for (pos, _) in grid.iter() {
                blends += edge_blend(pos.x, pos.y, black_box(&grid)).len();
            }
            black_box(blends)
        });
    });
}

fn bench_travel(c: &mut Criterion) {
    let mut session = GameSession::new(&GameConfig::for_testing()).unwrap();

    c.bench_function("sail_to_next_island", |b| {
        b.iter(|| {
            let dock = session.island().dock;
            session.teleport_player(dock.center());
            black_box(session.travel().unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_classify_grid,
    bench_generate_island,
    bench_edge_blend,
    bench_travel
);
criterion_main!(benches);
