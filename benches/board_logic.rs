use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3::core::{find_matches, find_possible_swap, gravity, Grid, SymbolRng, SymbolSet};
use match3::types::Pos;

fn dealt_board() -> (Grid, SymbolSet, SymbolRng) {
    let symbols = SymbolSet::with_count(6).unwrap();
    let mut rng = SymbolRng::new(12345);
    let grid = Grid::deal(8, 8, &symbols, &mut rng).unwrap();
    (grid, symbols, rng)
}

fn bench_deal(c: &mut Criterion) {
    let symbols = SymbolSet::with_count(6).unwrap();
    let mut rng = SymbolRng::new(12345);
    let mut grid = Grid::empty(8, 8).unwrap();

    c.bench_function("deal_8x8", |b| {
        b.iter(|| {
            grid.redeal(black_box(&symbols), &mut rng);
        })
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let (grid, _, _) = dealt_board();

    c.bench_function("find_matches_8x8", |b| {
        b.iter(|| find_matches(black_box(&grid)))
    });
}

fn bench_find_possible_swap(c: &mut Criterion) {
    let (grid, _, _) = dealt_board();

    c.bench_function("find_possible_swap_8x8", |b| {
        b.iter(|| find_possible_swap(black_box(&grid)))
    });
}

fn bench_gravity(c: &mut Criterion) {
    let (grid, symbols, mut rng) = dealt_board();

    c.bench_function("gravity_clear_bottom_row", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            for x in 0..8 {
                let _ = g.set(Pos::new(x, 0), None);
            }
            gravity::resolve(&mut g, &symbols, &mut rng)
        })
    });
}

fn bench_cascade(c: &mut Criterion) {
    let symbols = SymbolSet::with_count(4).unwrap();
    let mut rng = SymbolRng::new(7);

    c.bench_function("cascade_after_hinted_swap", |b| {
        b.iter(|| {
            let mut grid = Grid::deal(8, 8, &symbols, &mut rng).unwrap();
            if let Some((p, q)) = find_possible_swap(&grid) {
                let _ = grid.swap_symbols(p, q);
            }
            loop {
                let matches = find_matches(&grid);
                if matches.is_empty() {
                    break;
                }
                for pos in matches {
                    let _ = grid.set(pos, None);
                }
                gravity::resolve(&mut grid, &symbols, &mut rng);
            }
            grid
        })
    });
}

criterion_group!(
    benches,
    bench_deal,
    bench_find_matches,
    bench_find_possible_swap,
    bench_gravity,
    bench_cascade
);
criterion_main!(benches);
