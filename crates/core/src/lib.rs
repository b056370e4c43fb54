//! Core board logic - pure, deterministic, and testable
//!
//! This crate holds the match-3 rules with **no dependencies** on async
//! runtimes, rendering, or I/O:
//!
//! - **Deterministic**: Same seed and same inputs produce identical games
//! - **Testable**: Every rule is a plain function or a small value type
//! - **Portable**: Runs under any driver (async engine, headless bench, tests)
//!
//! # Module Structure
//!
//! - [`grid`]: the authoritative `width x height` board with bounds-checked access
//! - [`matcher`]: run detection (rows and columns, runs of three or more)
//! - [`gravity`]: per-column compaction and random refill after a clear
//! - [`session`]: score, move budget, and the game-over latch
//! - [`rng`]: symbol sets and the seeded generator behind every draw
//! - [`snapshot`]: serialisable read-only view of a board between turns
//!
//! # Example
//!
//! ```
//! use match3_core::{find_matches, gravity, Grid, ScoreSession, SymbolRng, SymbolSet};
//! use match3_types::Pos;
//!
//! let symbols = SymbolSet::with_count(4).unwrap();
//! let mut rng = SymbolRng::new(12345);
//!
//! // Bottom row is A A B C; swapping (2, 0) with (2, 1) makes A A A C.
//! let mut grid = Grid::from_rows(&["CDAB", "DCAD", "AABC"]).unwrap();
//! grid.swap_symbols(Pos::new(2, 0), Pos::new(2, 1)).unwrap();
//!
//! let matches = find_matches(&grid);
//! assert_eq!(matches.len(), 3);
//!
//! let mut session = ScoreSession::new(30);
//! session.credit_cleared(matches.len());
//! for pos in &matches {
//!     grid.set(*pos, None).unwrap();
//! }
//! gravity::resolve(&mut grid, &symbols, &mut rng);
//!
//! assert_eq!(session.score(), 30);
//! assert_eq!(grid.empty_count(), 0);
//! ```

pub mod error;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use error::BoardError;
pub use gravity::{GravityReport, Spawn, TileMove};
pub use grid::Grid;
pub use matcher::{find_matches, find_possible_swap, find_runs, Axis, Run};
pub use rng::{SymbolRng, SymbolSet};
pub use session::{ScoreSession, SessionChange};
pub use snapshot::BoardSnapshot;
