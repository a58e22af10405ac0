use criterion::{Criterion, black_box, criterion_group, criterion_main};

use grid_caster::player::PlayerState;
use grid_caster::raycaster::{Viewport, cast_frame, cast_frame_par};
use grid_caster::world::GridMap;

fn bench_cast_frame(c: &mut Criterion) {
    let grid = GridMap::default();
    let player = PlayerState::default().rotated(0.4);
    let viewport = Viewport {
        width: 800,
        height: 600,
    };
    let mut out = Vec::with_capacity(viewport.width as usize);

    c.bench_function("cast_frame 800x600", |b| {
        b.iter(|| cast_frame(black_box(&player), &grid, viewport, &mut out))
    });
    c.bench_function("cast_frame_par 800x600", |b| {
        b.iter(|| cast_frame_par(black_box(&player), &grid, viewport, &mut out))
    });
}

criterion_group!(benches, bench_cast_frame);
criterion_main!(benches);
