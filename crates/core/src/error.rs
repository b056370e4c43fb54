//! Error types for board construction and access.

use thiserror::Error;

use crate::types::MIN_SYMBOLS;

/// Errors raised by the board core.
///
/// Configuration errors surface at construction and stop the game from
/// starting. Out-of-bounds errors are programmer or input errors and are never
/// clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("position ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: i16,
        y: i16,
        width: u16,
        height: u16,
    },

    #[error("symbol set has {count} symbols, at least {min} are required", min = MIN_SYMBOLS)]
    TooFewSymbols { count: usize },

    #[error("symbol set contains {symbol} more than once")]
    DuplicateSymbol { symbol: char },

    #[error("board dimensions {width}x{height} are not supported")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("move budget must be at least 1")]
    NoMoves,

    #[error(
        "prepared board is {width}x{height}, configured board is {expected_width}x{expected_height}"
    )]
    SizeMismatch {
        width: u16,
        height: u16,
        expected_width: u16,
        expected_height: u16,
    },

    #[error("prepared board has {count} empty cells")]
    EmptyCells { count: usize },

    #[error("prepared board uses {symbol}, which is not in the symbol set")]
    ForeignSymbol { symbol: char },

    #[error("prepared board already contains {cells} matched cells")]
    PrematchedBoard { cells: usize },
}
