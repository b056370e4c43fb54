//! Gravity - compaction and refill after a clear
//!
//! Each column is handled on its own: surviving symbols keep their relative
//! order and slide down to the bottom of the column, then the vacated cells at
//! the top are filled with fresh symbols drawn uniformly from the symbol set.
//!
//! Refills are *not* checked against neighbours. New runs created here are
//! what drive the cascade loop.

use crate::grid::Grid;
use crate::rng::{SymbolRng, SymbolSet};
use crate::types::{Cell, Pos, Symbol};

/// A surviving tile sliding from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileMove {
    pub from: Pos,
    pub to: Pos,
}

/// A freshly spawned tile.
///
/// `from` lies above the board (`y >= height`): spawns in a column enter in
/// stacking order, the lowest spawn starting just above the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub from: Pos,
    pub to: Pos,
    pub symbol: Symbol,
}

/// What a gravity pass changed, for the animation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityReport {
    pub shifted: Vec<TileMove>,
    pub spawned: Vec<Spawn>,
}

impl GravityReport {
    pub fn is_empty(&self) -> bool {
        self.shifted.is_empty() && self.spawned.is_empty()
    }
}

/// Compact one column (bottom to top) in place.
///
/// Returns `(from_y, to_y)` for every symbol that moved, and the number of
/// non-empty cells now stacked at the bottom.
pub fn compact_column(column: &mut [Cell]) -> (Vec<(usize, usize)>, usize) {
    let mut moves = Vec::new();
    let mut write = 0;
    for read in 0..column.len() {
        if column[read].is_some() {
            if read != write {
                column[write] = column[read];
                column[read] = None;
                moves.push((read, write));
            }
            write += 1;
        }
    }
    (moves, write)
}

/// Compact every column and refill the vacated cells.
///
/// Columns are data-disjoint and processed left to right; refills in a column
/// are drawn from the top cell downward.
pub fn resolve(grid: &mut Grid, symbols: &SymbolSet, rng: &mut SymbolRng) -> GravityReport {
    let height = usize::from(grid.height());
    let mut report = GravityReport::default();
    let mut column: Vec<Cell> = Vec::with_capacity(height);

    for x in 0..usize::from(grid.width()) {
        column.clear();
        column.extend(grid.column(x));

        let (moves, filled) = compact_column(&mut column);
        if filled == height {
            continue;
        }

        let xi = x as i16;
        report.shifted.extend(moves.into_iter().map(|(from, to)| TileMove {
            from: Pos::new(xi, from as i16),
            to: Pos::new(xi, to as i16),
        }));

        for y in (filled..height).rev() {
            column[y] = Some(rng.draw(symbols));
        }
        for (i, y) in (filled..height).enumerate() {
            if let Some(symbol) = column[y] {
                report.spawned.push(Spawn {
                    from: Pos::new(xi, (height + i) as i16),
                    to: Pos::new(xi, y as i16),
                    symbol,
                });
            }
        }

        grid.write_column(x, &column);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_keeps_relative_order() {
        let a = Some(Symbol(0));
        let b = Some(Symbol(1));
        let mut col = vec![None, a, None, b, None];
        let (moves, filled) = compact_column(&mut col);
        assert_eq!(col, vec![a, b, None, None, None]);
        assert_eq!(filled, 2);
        assert_eq!(moves, vec![(1, 0), (3, 1)]);
    }

    #[test]
    fn full_column_untouched() {
        let mut col = vec![Some(Symbol(0)), Some(Symbol(1))];
        let (moves, filled) = compact_column(&mut col);
        assert!(moves.is_empty());
        assert_eq!(filled, 2);
    }

    #[test]
    fn resolve_fills_every_hole() {
        let mut grid = Grid::from_rows(&["AB.", "C.A", "..B"]).unwrap();
        let set = SymbolSet::with_count(4).unwrap();
        let mut rng = SymbolRng::new(3);

        let report = resolve(&mut grid, &set, &mut rng);
        assert_eq!(grid.empty_count(), 0);
        assert_eq!(report.spawned.len(), 4);

        // Column 0 was [., C, A] bottom-up: C and A slide down one row.
        assert_eq!(grid.get(Pos::new(0, 0)).unwrap(), Some(Symbol(2)));
        assert_eq!(grid.get(Pos::new(0, 1)).unwrap(), Some(Symbol(0)));
        assert!(report.shifted.contains(&TileMove {
            from: Pos::new(0, 1),
            to: Pos::new(0, 0)
        }));
    }

    #[test]
    fn spawns_enter_from_above_in_stacking_order() {
        let mut grid = Grid::from_rows(&["A", ".", "."]).unwrap();
        let set = SymbolSet::with_count(3).unwrap();
        let mut rng = SymbolRng::new(11);

        let report = resolve(&mut grid, &set, &mut rng);
        assert_eq!(grid.get(Pos::new(0, 0)).unwrap(), Some(Symbol(0)));
        assert_eq!(
            report.spawned.iter().map(|s| (s.from, s.to)).collect::<Vec<_>>(),
            vec![
                (Pos::new(0, 3), Pos::new(0, 1)),
                (Pos::new(0, 4), Pos::new(0, 2))
            ]
        );
        for spawn in &report.spawned {
            assert_eq!(grid.get(spawn.to).unwrap(), Some(spawn.symbol));
        }
    }

    #[test]
    fn nothing_to_do_on_full_board() {
        let mut grid = Grid::from_rows(&["AB", "BA"]).unwrap();
        let before = grid.clone();
        let set = SymbolSet::with_count(3).unwrap();
        let report = resolve(&mut grid, &set, &mut SymbolRng::new(0));
        assert!(report.is_empty());
        assert_eq!(grid, before);
    }
}
