//! Score session - score, move budget, and the game-over latch
//!
//! The session is a set of counters. Every change is recorded as a
//! [`SessionChange`] which the owner drains with [`ScoreSession::take_changes`]
//! and forwards to whoever displays them.
//!
//! Spending the last move does not end the game by itself. The owner calls
//! [`ScoreSession::latch_game_over`] once the board has fully settled, so a
//! cascade started on the last move always finishes and scores.

use crate::types::POINTS_PER_CELL;

/// A change to the session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Score(u32),
    Moves(u32),
    GameOver(u32),
}

/// Per-game counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSession {
    score: u32,
    moves_remaining: u32,
    game_over: bool,
    changes: Vec<SessionChange>,
}

impl ScoreSession {
    /// Start a session with the given move budget.
    pub fn new(moves: u32) -> Self {
        Self {
            score: 0,
            moves_remaining: moves,
            game_over: false,
            changes: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the move budget is spent.
    pub fn out_of_moves(&self) -> bool {
        self.moves_remaining == 0
    }

    /// Add points. The score never decreases.
    pub fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.changes.push(SessionChange::Score(self.score));
    }

    /// Credit `cells` cleared cells at [`POINTS_PER_CELL`] each. Returns the points added.
    pub fn credit_cleared(&mut self, cells: usize) -> u32 {
        let points = u32::try_from(cells)
            .unwrap_or(u32::MAX)
            .saturating_mul(POINTS_PER_CELL);
        self.add_score(points);
        points
    }

    /// Spend one move. No-op once the budget is spent.
    ///
    /// Calling this after game over is a bug in the caller.
    pub fn decrement_moves(&mut self) {
        debug_assert!(!self.game_over, "move charged after game over");
        if self.game_over || self.moves_remaining == 0 {
            return;
        }
        self.moves_remaining -= 1;
        self.changes.push(SessionChange::Moves(self.moves_remaining));
    }

    /// Latch game over if the budget is spent.
    ///
    /// Returns `true` only on the call that latches.
    pub fn latch_game_over(&mut self) -> bool {
        if self.game_over || self.moves_remaining > 0 {
            return false;
        }
        self.game_over = true;
        self.changes.push(SessionChange::GameOver(self.score));
        true
    }

    /// Drain recorded changes, oldest first.
    pub fn take_changes(&mut self) -> Vec<SessionChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session() {
        let session = ScoreSession::new(30);
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves_remaining(), 30);
        assert!(!session.is_game_over());
    }

    #[test]
    fn scoring_per_cell() {
        let mut session = ScoreSession::new(5);
        assert_eq!(session.credit_cleared(3), 30);
        assert_eq!(session.credit_cleared(5), 50);
        assert_eq!(session.score(), 80);
        assert_eq!(
            session.take_changes(),
            vec![SessionChange::Score(30), SessionChange::Score(80)]
        );
        assert!(session.take_changes().is_empty());
    }

    #[test]
    fn zero_points_is_silent() {
        let mut session = ScoreSession::new(5);
        session.add_score(0);
        assert!(session.take_changes().is_empty());
    }

    #[test]
    fn moves_stop_at_zero() {
        let mut session = ScoreSession::new(1);
        session.decrement_moves();
        session.decrement_moves();
        assert_eq!(session.moves_remaining(), 0);
        assert_eq!(session.take_changes(), vec![SessionChange::Moves(0)]);
    }

    #[test]
    fn last_move_does_not_end_the_game_alone() {
        let mut session = ScoreSession::new(1);
        session.decrement_moves();
        assert!(session.out_of_moves());
        assert!(!session.is_game_over());

        session.add_score(40);
        assert!(session.latch_game_over());
        assert!(session.is_game_over());
        assert!(!session.latch_game_over());
        assert_eq!(
            session.take_changes().last(),
            Some(&SessionChange::GameOver(40))
        );
    }

    #[test]
    fn latch_refused_with_moves_left() {
        let mut session = ScoreSession::new(2);
        session.decrement_moves();
        assert!(!session.latch_game_over());
        assert!(!session.is_game_over());
    }
}
