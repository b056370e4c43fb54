use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::session::ScoreSession;
use crate::types::{Cell, Pos, TurnState};

/// Read-only copy of everything a renderer or observer needs.
///
/// Snapshots are only taken between turns, so `cells` never holds an empty
/// cell in a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u16,
    pub height: u16,
    /// Row-major, bottom row first.
    pub cells: Vec<Cell>,
    pub score: u32,
    pub moves_remaining: u32,
    pub state: TurnState,
    pub selection: Option<Pos>,
    pub seed: u64,
}

impl BoardSnapshot {
    pub fn capture(
        grid: &Grid,
        session: &ScoreSession,
        state: TurnState,
        selection: Option<Pos>,
        seed: u64,
    ) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().to_vec(),
            score: session.score(),
            moves_remaining: session.moves_remaining(),
            state,
            selection,
            seed,
        }
    }

    /// Cell at `pos`, `None` when off the board.
    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        if pos.x < 0 || pos.y < 0 || pos.x as u16 >= self.width || pos.y as u16 >= self.height {
            return None;
        }
        self.cells
            .get(pos.y as usize * usize::from(self.width) + pos.x as usize)
            .copied()
    }

    pub fn playable(&self) -> bool {
        self.state == TurnState::Idle
    }
}
