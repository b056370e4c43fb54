//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the engine.
//! All types are plain data with serde support and no runtime behaviour, so
//! they can cross the boundary to rendering, input, or persistence code
//! without dragging the board logic along.
//!
//! # Coordinates
//!
//! Boards are addressed by [`Pos`] with `(0, 0)` at the bottom-left corner:
//!
//! - `x` grows to the right, `0 <= x < width`
//! - `y` grows upward, `0 <= y < height`
//! - the "below" neighbour of `(x, y)` is `(x, y - 1)`
//!
//! Gravity pulls symbols toward `y = 0`; fresh symbols enter from the top row.
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `POINTS_PER_CELL` | 10 | Score for every cleared cell |
//! | `MIN_MATCH_LEN` | 3 | Shortest run that counts as a match |
//! | `MIN_SYMBOLS` | 3 | Smallest symbol set a board accepts |
//! | `DEFAULT_MOVES` | 30 | Move budget of a fresh session |
//! | `DEFAULT_TWEEN_MS` | 250 | Default duration of a single tween |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Pos, Symbol};
//!
//! let a = Pos::new(2, 0);
//! let b = Pos::new(2, 1);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Pos::new(3, 1)));
//!
//! let s = Symbol::from_char('c').unwrap();
//! assert_eq!(s.as_char(), 'C');
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Score awarded for every cleared cell.
pub const POINTS_PER_CELL: u32 = 10;

/// Shortest run of identical symbols that is cleared.
pub const MIN_MATCH_LEN: usize = 3;

/// Smallest symbol set that can deal a board without a pre-existing match.
pub const MIN_SYMBOLS: usize = 3;

/// Default board width in cells.
pub const DEFAULT_WIDTH: u16 = 8;

/// Default board height in cells.
pub const DEFAULT_HEIGHT: u16 = 8;

/// Default number of distinct symbols on a board.
pub const DEFAULT_SYMBOLS: u8 = 6;

/// Move budget of a fresh session.
pub const DEFAULT_MOVES: u32 = 30;

/// Default duration of a single tween in milliseconds.
pub const DEFAULT_TWEEN_MS: u64 = 250;

/// A board coordinate.
///
/// Coordinates are signed so that input layers can hand over anything they
/// computed from screen space; bounds are checked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i16,
    pub y: i16,
}

impl Pos {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions.
    pub fn manhattan(self, other: Pos) -> u32 {
        let dx = (i32::from(self.x) - i32::from(other.x)).unsigned_abs();
        let dy = (i32::from(self.y) - i32::from(other.y)).unsigned_abs();
        dx + dy
    }

    /// Whether `other` is one of the four orthogonal neighbours.
    ///
    /// ```
    /// use match3_types::Pos;
    ///
    /// assert!(Pos::new(0, 0).is_adjacent(Pos::new(1, 0)));
    /// assert!(!Pos::new(0, 0).is_adjacent(Pos::new(1, 1)));
    /// assert!(!Pos::new(0, 0).is_adjacent(Pos::new(0, 0)));
    /// ```
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }

    /// Position shifted by `(dx, dy)`, or `None` on overflow.
    pub fn offset(self, dx: i16, dy: i16) -> Option<Pos> {
        Some(Pos::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A tile kind.
///
/// Symbols are small indices; the rendering side decides which sprite each
/// index maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub u8);

impl Symbol {
    /// Letter used in text dumps: `A` for symbol 0, `B` for symbol 1, ...
    ///
    /// Indices past `Z` fall back to `?`.
    pub fn as_char(self) -> char {
        if self.0 < 26 {
            char::from(b'A' + self.0)
        } else {
            '?'
        }
    }

    /// Parse a letter (case-insensitive) back into a symbol.
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Symbol(upper as u8 - b'A'))
        } else {
            None
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A cell on the board
///
/// - `None`: Empty cell (only observable mid-cascade)
/// - `Some(Symbol)`: Cell holding the given symbol
pub type Cell = Option<Symbol>;

/// Lifecycle state of the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TurnState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A swap, its cascade, or an animation is in flight; input is ignored.
    Locked,
    /// Move budget spent and the board settled. Terminal.
    GameOver,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::Locked => "locked",
            TurnState::GameOver => "gameOver",
        }
    }
}

/// Notifications emitted by the engine for UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    /// A cell's content changed. `symbol` is `None` when the cell was cleared.
    CellChanged { pos: Pos, symbol: Cell },
    /// The highlighted selection changed.
    SelectionChanged { selection: Option<Pos> },
    ScoreChanged { score: u32 },
    MovesChanged { moves_remaining: u32 },
    /// `true` while the controller is locked.
    BusyChanged { busy: bool },
    /// The board had no possible move left and was dealt again.
    Reshuffled,
    /// The session ended.
    GameOver {
        final_score: u32,
        high_score: u32,
        new_best: bool,
    },
}

impl BoardEvent {
    /// Protocol name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardEvent::CellChanged { .. } => "cellChanged",
            BoardEvent::SelectionChanged { .. } => "selectionChanged",
            BoardEvent::ScoreChanged { .. } => "scoreChanged",
            BoardEvent::MovesChanged { .. } => "movesChanged",
            BoardEvent::BusyChanged { .. } => "busyChanged",
            BoardEvent::Reshuffled => "reshuffled",
            BoardEvent::GameOver { .. } => "gameOver",
        }
    }
}
