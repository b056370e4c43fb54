//! Grid module - the authoritative board
//!
//! The grid is a `width x height` array of [`Cell`]s stored flat in row-major
//! order (`y * width + x`), with `y = 0` as the bottom row. It knows nothing
//! about matching or scoring: it only reads, writes, and swaps cells, and
//! rejects any coordinate outside the board.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::rng::{SymbolRng, SymbolSet};
use crate::types::{Cell, Pos, Symbol};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a board with every cell empty.
    pub fn empty(width: u16, height: u16) -> Result<Self, BoardError> {
        if width == 0 || height == 0 || width > i16::MAX as u16 || height > i16::MAX as u16 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; usize::from(width) * usize::from(height)],
        })
    }

    /// Deal a full board in which no cell repeats its left or below neighbour.
    ///
    /// Each cell is drawn uniformly from the symbols that differ from those two
    /// neighbours, so the dealt board never contains a run of three.
    pub fn deal(
        width: u16,
        height: u16,
        symbols: &SymbolSet,
        rng: &mut SymbolRng,
    ) -> Result<Self, BoardError> {
        let mut grid = Self::empty(width, height)?;
        grid.redeal(symbols, rng);
        Ok(grid)
    }

    /// Refill every cell with the constrained deal, keeping the dimensions.
    pub fn redeal(&mut self, symbols: &SymbolSet, rng: &mut SymbolRng) {
        let width = usize::from(self.width);
        for y in 0..usize::from(self.height) {
            for x in 0..width {
                let mut excluded: ArrayVec<Symbol, 2> = ArrayVec::new();
                if x > 0 {
                    if let Some(left) = self.cells[y * width + x - 1] {
                        excluded.push(left);
                    }
                }
                if y > 0 {
                    if let Some(below) = self.cells[(y - 1) * width + x] {
                        excluded.push(below);
                    }
                }
                self.cells[y * width + x] = Some(rng.draw_excluding(symbols, &excluded));
            }
        }
    }

    /// Build a board from text rows, top row first.
    ///
    /// Letters map to symbols (`A` = 0, `B` = 1, ...); any other character is
    /// an empty cell.
    ///
    /// ```
    /// use match3_core::Grid;
    /// use match3_types::{Pos, Symbol};
    ///
    /// let grid = Grid::from_rows(&["BC", "AA"]).unwrap();
    /// assert_eq!(grid.get(Pos::new(0, 0)).unwrap(), Some(Symbol(0)));
    /// assert_eq!(grid.get(Pos::new(1, 1)).unwrap(), Some(Symbol(2)));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut grid = Self::empty(
            u16::try_from(width).unwrap_or(u16::MAX),
            u16::try_from(height).unwrap_or(u16::MAX),
        )?;

        for (row, text) in rows.iter().enumerate() {
            let found = text.chars().count();
            if found != width {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = height - 1 - row;
            for (x, c) in text.chars().enumerate() {
                grid.cells[y * width + x] = Symbol::from_char(c);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whether `pos` lies on the board.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u16) < self.width && (pos.y as u16) < self.height
    }

    /// Calculate flat index from a position
    #[inline]
    fn index(&self, pos: Pos) -> Result<usize, BoardError> {
        if !self.contains(pos) {
            return Err(BoardError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y as usize * usize::from(self.width) + pos.x as usize)
    }

    /// Cell content at `pos`.
    pub fn get(&self, pos: Pos) -> Result<Cell, BoardError> {
        Ok(self.cells[self.index(pos)?])
    }

    /// Overwrite the cell at `pos`.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> Result<(), BoardError> {
        let idx = self.index(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Exchange the contents of two cells.
    ///
    /// Both positions are checked before anything is written.
    pub fn swap_symbols(&mut self, a: Pos, b: Pos) -> Result<(), BoardError> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Whether two on-board positions are orthogonal neighbours.
    pub fn is_adjacent(&self, a: Pos, b: Pos) -> Result<bool, BoardError> {
        self.index(a)?;
        self.index(b)?;
        Ok(a.is_adjacent(b))
    }

    /// On-board orthogonal neighbours of `pos` (right, up, left, down).
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        for (dx, dy) in [(1, 0), (0, 1), (-1, 0), (0, -1)] {
            if let Some(n) = pos.offset(dx, dy) {
                if self.contains(n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Every position on the board, column by column from the bottom.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width as i16, self.height as i16);
        (0..w).flat_map(move |x| (0..h).map(move |y| Pos::new(x, y)))
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Whether no cell equals its left or below neighbour.
    pub fn is_deal_valid(&self) -> bool {
        let width = usize::from(self.width);
        for y in 0..usize::from(self.height) {
            for x in 0..width {
                let cell = self.cells[y * width + x];
                if cell.is_none() {
                    return false;
                }
                if x > 0 && self.cells[y * width + x - 1] == cell {
                    return false;
                }
                if y > 0 && self.cells[(y - 1) * width + x] == cell {
                    return false;
                }
            }
        }
        true
    }

    /// Get a reference to the flat cell storage.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One column, bottom to top.
    pub(crate) fn column(&self, x: usize) -> impl Iterator<Item = Cell> + '_ {
        let width = usize::from(self.width);
        (0..usize::from(self.height)).map(move |y| self.cells[y * width + x])
    }

    /// Write one column, bottom to top.
    pub(crate) fn write_column(&mut self, x: usize, column: &[Cell]) {
        let width = usize::from(self.width);
        for (y, cell) in column.iter().enumerate() {
            self.cells[y * width + x] = *cell;
        }
    }

    /// Text rows, top row first, in the format accepted by [`Grid::from_rows`].
    pub fn to_rows(&self) -> Vec<String> {
        let width = usize::from(self.width);
        (0..usize::from(self.height))
            .rev()
            .map(|y| {
                self.cells[y * width..(y + 1) * width]
                    .iter()
                    .map(|c| c.map(Symbol::as_char).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_calculation() {
        let grid = Grid::empty(4, 3).unwrap();
        assert_eq!(grid.index(Pos::new(0, 0)), Ok(0));
        assert_eq!(grid.index(Pos::new(3, 0)), Ok(3));
        assert_eq!(grid.index(Pos::new(0, 1)), Ok(4));
        assert_eq!(grid.index(Pos::new(3, 2)), Ok(11));
        assert!(grid.index(Pos::new(-1, 0)).is_err());
        assert!(grid.index(Pos::new(4, 0)).is_err());
        assert!(grid.index(Pos::new(0, 3)).is_err());
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert_eq!(
            Grid::empty(0, 5),
            Err(BoardError::InvalidDimensions {
                width: 0,
                height: 5
            })
        );
        assert!(Grid::empty(5, 0).is_err());
        assert!(Grid::empty(1, 1).is_ok());
    }

    #[test]
    fn rows_roundtrip_through_text() {
        let rows = ["ABCA", "B.AB", "CABC"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.empty_count(), 1);
        assert_eq!(grid.get(Pos::new(1, 1)), Ok(None));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            Grid::from_rows(&["ABC", "AB"]),
            Err(BoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn column_io() {
        let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        let col: Vec<Cell> = grid.column(1).collect();
        assert_eq!(col, vec![Some(Symbol(3)), Some(Symbol(1))]);

        grid.write_column(0, &[None, Some(Symbol(4))]);
        assert_eq!(grid.to_rows(), vec!["EB", ".D"]);
    }

    #[test]
    fn neighbors_at_corner_and_center() {
        let grid = Grid::empty(3, 3).unwrap();
        assert_eq!(grid.neighbors(Pos::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors(Pos::new(1, 1)).len(), 4);
        assert_eq!(grid.neighbors(Pos::new(2, 1)).len(), 3);
    }

    #[test]
    fn deal_is_full_and_valid() {
        let set = SymbolSet::with_count(3).unwrap();
        for seed in 0..50 {
            let mut rng = SymbolRng::new(seed);
            let grid = Grid::deal(9, 7, &set, &mut rng).unwrap();
            assert_eq!(grid.empty_count(), 0);
            assert!(grid.is_deal_valid(), "seed {seed}:\n{grid}");
        }
    }
}
