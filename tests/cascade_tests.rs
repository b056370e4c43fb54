//! Match detection and gravity working together

use match3::core::{find_matches, find_possible_swap, gravity, Grid, SymbolRng, SymbolSet};
use match3::types::{Pos, Symbol};

fn column(grid: &Grid, x: i16) -> Vec<Option<Symbol>> {
    (0..grid.height() as i16)
        .map(|y| grid.get(Pos::new(x, y)).unwrap())
        .collect()
}

#[test]
fn test_gravity_preserves_order_and_fills_every_gap() {
    // Column 0 bottom-up: A . B . C
    let mut grid = Grid::from_rows(&["C", ".", "B", ".", "A"]).unwrap();
    let symbols = SymbolSet::with_count(4).unwrap();
    let mut rng = SymbolRng::new(1);

    let report = gravity::resolve(&mut grid, &symbols, &mut rng);

    let col = column(&grid, 0);
    assert_eq!(&col[..3], &[Some(Symbol(0)), Some(Symbol(1)), Some(Symbol(2))]);
    assert_eq!(grid.empty_count(), 0);
    assert_eq!(report.shifted.len(), 2);
    assert_eq!(report.spawned.len(), 2);
    for spawn in &report.spawned {
        assert!(spawn.from.y >= grid.height() as i16);
        assert!(symbols.contains(spawn.symbol));
    }
}

#[test]
fn test_full_board_is_left_alone() {
    let mut grid = Grid::from_rows(&["AB", "BA"]).unwrap();
    let before = grid.clone();
    let symbols = SymbolSet::with_count(3).unwrap();
    let report = gravity::resolve(&mut grid, &symbols, &mut SymbolRng::new(0));
    assert!(report.is_empty());
    assert_eq!(grid, before);
}

/// Run the clear-and-refill loop by hand until the board settles.
fn settle(grid: &mut Grid, symbols: &SymbolSet, rng: &mut SymbolRng) -> u32 {
    let mut steps = 0;
    loop {
        let matches = find_matches(grid);
        if matches.is_empty() {
            return steps;
        }
        steps += 1;
        for pos in matches {
            grid.set(pos, None).unwrap();
        }
        gravity::resolve(grid, symbols, rng);
        assert!(steps < 10_000, "cascade did not terminate");
    }
}

#[test]
fn test_cascades_terminate_and_leave_a_clean_board() {
    for n in 3..=5 {
        let symbols = SymbolSet::with_count(n).unwrap();
        for seed in 0..40 {
            let mut rng = SymbolRng::new(seed);
            let mut grid = Grid::deal(6, 6, &symbols, &mut rng).unwrap();
            let Some((a, b)) = find_possible_swap(&grid) else {
                continue;
            };
            grid.swap_symbols(a, b).unwrap();
            let steps = settle(&mut grid, &symbols, &mut rng);

            assert!(steps >= 1);
            assert!(find_matches(&grid).is_empty());
            assert_eq!(grid.empty_count(), 0);
        }
    }
}

#[test]
fn test_hinted_swap_always_matches() {
    let symbols = SymbolSet::with_count(6).unwrap();
    for seed in 0..25 {
        let mut rng = SymbolRng::new(seed);
        let mut grid = Grid::deal(8, 8, &symbols, &mut rng).unwrap();
        if let Some((a, b)) = find_possible_swap(&grid) {
            assert!(a.is_adjacent(b));
            grid.swap_symbols(a, b).unwrap();
            assert!(!find_matches(&grid).is_empty());
        }
    }
}

#[test]
fn test_dead_board_has_no_hint() {
    let grid = Grid::from_rows(&["ABC", "BCA", "CAB"]).unwrap();
    assert_eq!(find_possible_swap(&grid), None);
}
