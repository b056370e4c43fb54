//! Match detection
//!
//! A match is a maximal run of three or more identical, non-empty symbols
//! along a row or a column. Detection is an exhaustive linear scan of every
//! row and every column, so the result does not depend on scan order. The
//! result is a set: a cell that sits in both a horizontal and a vertical run
//! is reported once.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::types::{Cell, Pos, Symbol, MIN_MATCH_LEN};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal run of identical symbols of length >= 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub symbol: Symbol,
    /// Leftmost (horizontal) or lowest (vertical) cell of the run.
    pub start: Pos,
    pub len: usize,
    pub axis: Axis,
}

impl Run {
    /// Positions covered by the run.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len as i16).map(move |i| match self.axis {
            Axis::Horizontal => Pos::new(self.start.x + i, self.start.y),
            Axis::Vertical => Pos::new(self.start.x, self.start.y + i),
        })
    }
}

/// All runs of length >= 3, rows first (bottom to top), then columns (left to right).
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let width = grid.width() as i16;
    let height = grid.height() as i16;
    let cells = grid.cells();
    let at = |x: i16, y: i16| -> Cell { cells[y as usize * width as usize + x as usize] };

    let mut runs = Vec::new();
    for y in 0..height {
        scan_line(width, |i| at(i, y), |i| Pos::new(i, y), Axis::Horizontal, &mut runs);
    }
    for x in 0..width {
        scan_line(height, |i| at(x, i), |i| Pos::new(x, i), Axis::Vertical, &mut runs);
    }
    runs
}

/// Group one line into maximal runs and keep those long enough to match.
fn scan_line(
    len: i16,
    cell: impl Fn(i16) -> Cell,
    pos: impl Fn(i16) -> Pos,
    axis: Axis,
    out: &mut Vec<Run>,
) {
    let mut start = 0;
    while start < len {
        let current = cell(start);
        let mut end = start + 1;
        while end < len && cell(end) == current {
            end += 1;
        }
        let run_len = (end - start) as usize;
        if let Some(symbol) = current {
            if run_len >= MIN_MATCH_LEN {
                out.push(Run {
                    symbol,
                    start: pos(start),
                    len: run_len,
                    axis,
                });
            }
        }
        start = end;
    }
}

/// Every position that belongs to a match.
pub fn find_matches(grid: &Grid) -> BTreeSet<Pos> {
    find_runs(grid)
        .iter()
        .flat_map(|run| run.positions().collect::<Vec<_>>())
        .collect()
}

/// Whether the cell at `pos` is part of a match.
///
/// Only walks the row and column through `pos`.
pub fn is_matched_at(grid: &Grid, pos: Pos) -> bool {
    let symbol = match grid.get(pos) {
        Ok(Some(s)) => s,
        _ => return false,
    };
    let same = |p: Option<Pos>| p.and_then(|p| grid.get(p).ok()).flatten() == Some(symbol);
    let count = |dx: i16, dy: i16| {
        let mut n = 0;
        let mut cursor = pos.offset(dx, dy);
        while same(cursor) {
            n += 1;
            cursor = cursor.and_then(|c| c.offset(dx, dy));
        }
        n
    };

    1 + count(-1, 0) + count(1, 0) >= MIN_MATCH_LEN
        || 1 + count(0, -1) + count(0, 1) >= MIN_MATCH_LEN
}

/// First adjacent pair whose swap would create a match.
///
/// Scans column by column from the bottom, trying the right and upper
/// neighbour of each cell. Pairs holding the same symbol or an empty cell are
/// skipped.
pub fn find_possible_swap(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut probe = grid.clone();
    for a in grid.positions() {
        for b in [a.offset(1, 0), a.offset(0, 1)].into_iter().flatten() {
            if !grid.contains(b) {
                continue;
            }
            let (sa, sb) = (grid.get(a).ok()?, grid.get(b).ok()?);
            if sa.is_none() || sb.is_none() || sa == sb {
                continue;
            }
            probe.swap_symbols(a, b).ok()?;
            let hit = is_matched_at(&probe, a) || is_matched_at(&probe, b);
            probe.swap_symbols(a, b).ok()?;
            if hit {
                return Some((a, b));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i16, y: i16) -> Pos {
        Pos::new(x, y)
    }

    #[test]
    fn no_matches_on_a_checkerboard() {
        let grid = Grid::from_rows(&["ABAB", "BABA", "ABAB"]).unwrap();
        assert!(find_matches(&grid).is_empty());
        assert!(find_runs(&grid).is_empty());
    }

    #[test]
    fn horizontal_run_of_three() {
        let grid = Grid::from_rows(&["BCAB", "AAAC"]).unwrap();
        let matches = find_matches(&grid);
        assert_eq!(matches, BTreeSet::from([p(0, 0), p(1, 0), p(2, 0)]));
    }

    #[test]
    fn vertical_run_reported_once_per_cell() {
        let grid = Grid::from_rows(&["AB", "AC", "AB", "CC"]).unwrap();
        let runs = find_runs(&grid);
        assert_eq!(
            runs,
            vec![Run {
                symbol: Symbol(0),
                start: p(0, 1),
                len: 3,
                axis: Axis::Vertical
            }]
        );
        assert_eq!(find_matches(&grid).len(), 3);
    }

    #[test]
    fn crossing_runs_share_a_cell() {
        // An L of five A's: bottom row and left column share (0, 0).
        let grid = Grid::from_rows(&["ABC", "ACB", "AAA"]).unwrap();
        let matches = find_matches(&grid);
        assert_eq!(matches.len(), 5);
        assert!(matches.contains(&p(0, 0)));
        assert_eq!(find_runs(&grid).len(), 2);
    }

    #[test]
    fn long_run_is_one_run() {
        let grid = Grid::from_rows(&["AAAAA"]).unwrap();
        let runs = find_runs(&grid);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len, 5);
    }

    #[test]
    fn empty_cells_never_match() {
        let grid = Grid::from_rows(&["...", "ABC"]).unwrap();
        assert!(find_matches(&grid).is_empty());
    }

    #[test]
    fn two_runs_split_by_a_different_symbol() {
        let grid = Grid::from_rows(&["AAABAAA"]).unwrap();
        assert_eq!(find_runs(&grid).len(), 2);
        assert_eq!(find_matches(&grid).len(), 6);
    }

    #[test]
    fn local_check_agrees_with_full_scan() {
        let grid = Grid::from_rows(&["ABCA", "ABBC", "ACAB"]).unwrap();
        let matches = find_matches(&grid);
        for pos in grid.positions() {
            assert_eq!(is_matched_at(&grid, pos), matches.contains(&pos), "at {pos}");
        }
    }

    #[test]
    fn possible_swap_found() {
        // Swapping (2, 0) with (2, 1) completes AAA on the bottom row.
        let grid = Grid::from_rows(&["BCAB", "AABC"]).unwrap();
        let (a, b) = find_possible_swap(&grid).unwrap();
        let mut swapped = grid.clone();
        swapped.swap_symbols(a, b).unwrap();
        assert!(!find_matches(&swapped).is_empty());
    }

    #[test]
    fn no_possible_swap_on_dead_board() {
        let grid = Grid::from_rows(&["ABC", "BCA", "CAB"]).unwrap();
        assert!(find_matches(&grid).is_empty());
        assert_eq!(find_possible_swap(&grid), None);
    }
}
