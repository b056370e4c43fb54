//! Turn controller - the game's state machine
//!
//! The controller owns the grid, the session, the selection slot and the lock.
//! Player input enters through [`TurnController::select_cell`]:
//!
//! | State | Input | Result |
//! |-------|-------|--------|
//! | Idle, nothing selected | cell `P` | `P` selected |
//! | Idle, `P` selected | `P` again | selection cleared |
//! | Idle, `P` selected | `Q` not adjacent | `Q` selected instead |
//! | Idle, `P` selected | `Q` adjacent | lock, run the swap protocol |
//! | Locked or GameOver | anything | ignored |
//!
//! # Swap protocol
//!
//! 1. Animate `P` and `Q` onto each other's cell and await it.
//! 2. Swap the two symbols.
//! 3. No match: swap back, play a yoyo bounce, unlock. No move is charged.
//! 4. Match: charge one move and run the cascade loop.
//!
//! # Cascade loop
//!
//! While the board has matches: score 10 points per matched cell, empty the
//! matched cells and await the fade, apply gravity, await the settle
//! animation. Matches are always evaluated on a fully settled board.
//!
//! When the loop ends the turn is over: with no moves left the game-over latch
//! closes, otherwise the controller unlocks (re-dealing first if the board has
//! no possible move).

use log::{debug, info, warn};

use match3_core::{
    find_matches, find_possible_swap, gravity, BoardError, BoardSnapshot, Grid, ScoreSession,
    SessionChange, SymbolRng, SymbolSet, TileMove,
};
use match3_types::{BoardEvent, Pos, TurnState};

use crate::animation::Animator;
use crate::config::{AnimationTimings, GameConfig};
use crate::events::EventSink;
use crate::highscore::HighScoreStore;

/// How many deals are tried when looking for a board with a possible move.
const DEAL_ATTEMPTS: usize = 64;

/// Result of a committed swap, once its cascade has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnReport {
    /// Number of clear-and-refill steps; at least 1 for a committed swap.
    pub cascades: u32,
    /// Total cells cleared across all steps.
    pub cleared: usize,
    /// Points earned this turn.
    pub points: u32,
    pub moves_remaining: u32,
    pub game_over: bool,
}

/// What a single input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input arrived while locked or after game over, or named an empty cell.
    Ignored,
    Selected(Pos),
    Deselected,
    /// A non-adjacent cell replaced the previous selection.
    Reselected(Pos),
    /// The swap made no match and was undone.
    Reverted { a: Pos, b: Pos },
    Committed(TurnReport),
}

impl TurnOutcome {
    /// Whether this input went through the locked swap protocol.
    pub fn locked(&self) -> bool {
        matches!(self, TurnOutcome::Reverted { .. } | TurnOutcome::Committed(_))
    }
}

/// Single owner of a game's mutable state.
pub struct TurnController<A, S> {
    grid: Grid,
    symbols: SymbolSet,
    rng: SymbolRng,
    session: ScoreSession,
    moves: u32,
    state: TurnState,
    selection: Option<Pos>,
    timings: AnimationTimings,
    animator: A,
    events: S,
    high_scores: Box<dyn HighScoreStore>,
}

impl<A: Animator, S: EventSink> TurnController<A, S> {
    /// Start a game on a freshly dealt board.
    ///
    /// Fails when the configuration is invalid; a game that cannot be dealt
    /// never starts.
    pub fn new(
        config: &GameConfig,
        animator: A,
        events: S,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Result<Self, BoardError> {
        let symbols = config.validate()?;
        let mut rng = config
            .seed
            .map(SymbolRng::new)
            .unwrap_or_else(SymbolRng::from_entropy);
        let mut grid = Grid::empty(config.width, config.height)?;
        deal_playable(&mut grid, &symbols, &mut rng);

        info!(
            "Game started: {}x{} board, {} symbols, {} moves, seed {}",
            config.width,
            config.height,
            symbols.len(),
            config.moves,
            rng.seed()
        );

        Ok(Self::assemble(
            grid,
            symbols,
            rng,
            config,
            animator,
            events,
            high_scores,
        ))
    }

    /// Start a game on a prepared board.
    ///
    /// The board must match the configured size, be full, use only the
    /// configured symbols and hold no match yet. Refills draw from the
    /// configured symbol set and seed.
    pub fn with_grid(
        grid: Grid,
        config: &GameConfig,
        animator: A,
        events: S,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Result<Self, BoardError> {
        let symbols = config.validate()?;
        check_prepared(&grid, config, &symbols)?;
        let rng = config
            .seed
            .map(SymbolRng::new)
            .unwrap_or_else(SymbolRng::from_entropy);
        Ok(Self::assemble(
            grid,
            symbols,
            rng,
            config,
            animator,
            events,
            high_scores,
        ))
    }

    fn assemble(
        grid: Grid,
        symbols: SymbolSet,
        rng: SymbolRng,
        config: &GameConfig,
        animator: A,
        events: S,
        high_scores: Box<dyn HighScoreStore>,
    ) -> Self {
        Self {
            grid,
            symbols,
            rng,
            session: ScoreSession::new(config.moves),
            moves: config.moves,
            state: TurnState::Idle,
            selection: None,
            timings: config.timings,
            animator,
            events,
            high_scores,
        }
    }

    /// Replace the event sink, keeping everything else.
    pub fn map_events<T: EventSink>(self, f: impl FnOnce(S) -> T) -> TurnController<A, T> {
        TurnController {
            grid: self.grid,
            symbols: self.symbols,
            rng: self.rng,
            session: self.session,
            moves: self.moves,
            state: self.state,
            selection: self.selection,
            timings: self.timings,
            animator: self.animator,
            events: f(self.events),
            high_scores: self.high_scores,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> &ScoreSession {
        &self.session
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn selection(&self) -> Option<Pos> {
        self.selection
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut S {
        &mut self.events
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(
            &self.grid,
            &self.session,
            self.state,
            self.selection,
            self.rng.seed(),
        )
    }

    /// A swap that would score right now, if any.
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        if self.state != TurnState::Idle {
            return None;
        }
        find_possible_swap(&self.grid)
    }

    /// Handle a player selecting `pos`.
    ///
    /// Off-board positions are an error. Everything else, including input
    /// while locked, resolves to a [`TurnOutcome`].
    pub async fn select_cell(&mut self, pos: Pos) -> Result<TurnOutcome, BoardError> {
        if self.state != TurnState::Idle {
            debug!("Ignoring selection at {} while {}", pos, self.state.as_str());
            return Ok(TurnOutcome::Ignored);
        }
        if self.grid.get(pos)?.is_none() {
            return Ok(TurnOutcome::Ignored);
        }

        let adjacent = match self.selection {
            Some(prev) => self.grid.is_adjacent(prev, pos)?,
            None => false,
        };

        match self.selection {
            None => {
                self.set_selection(Some(pos));
                Ok(TurnOutcome::Selected(pos))
            }
            Some(prev) if prev == pos => {
                self.set_selection(None);
                Ok(TurnOutcome::Deselected)
            }
            Some(_) if !adjacent => {
                self.set_selection(Some(pos));
                Ok(TurnOutcome::Reselected(pos))
            }
            Some(prev) => {
                self.set_selection(None);
                self.lock();
                let result = self.swap(prev, pos).await;
                self.unlock();
                result
            }
        }
    }

    /// Deal a new board and reset the session.
    ///
    /// Refused (returns `false`) while a turn is in flight.
    pub fn restart(&mut self, seed: Option<u64>) -> bool {
        if self.state == TurnState::Locked {
            return false;
        }

        self.rng = seed.map(SymbolRng::new).unwrap_or_else(SymbolRng::from_entropy);
        self.session = ScoreSession::new(self.moves);
        self.state = TurnState::Idle;
        deal_playable(&mut self.grid, &self.symbols, &mut self.rng);
        info!("Game restarted with seed {}", self.rng.seed());

        self.set_selection(None);
        self.emit_all_cells();
        self.events.emit(BoardEvent::ScoreChanged { score: 0 });
        self.events.emit(BoardEvent::MovesChanged {
            moves_remaining: self.moves,
        });
        true
    }

    async fn swap(&mut self, a: Pos, b: Pos) -> Result<TurnOutcome, BoardError> {
        let moves = [TileMove { from: a, to: b }, TileMove { from: b, to: a }];
        self.animator.move_tiles(&moves, self.timings.swap()).await;

        self.grid.swap_symbols(a, b)?;
        if find_matches(&self.grid).is_empty() {
            self.grid.swap_symbols(a, b)?;
            debug!("Swap {} <-> {} made no match, reverting", a, b);
            self.animator.yoyo_tiles(a, b, self.timings.yoyo()).await;
            return Ok(TurnOutcome::Reverted { a, b });
        }

        self.emit_cell(a)?;
        self.emit_cell(b)?;
        self.session.decrement_moves();
        self.flush_session();

        let mut report = self.cascade().await?;
        report.moves_remaining = self.session.moves_remaining();
        report.game_over = self.finish_turn();

        debug!(
            "Swap {} <-> {} committed: {} step(s), {} cells, +{} points",
            a, b, report.cascades, report.cleared, report.points
        );
        Ok(TurnOutcome::Committed(report))
    }

    async fn cascade(&mut self) -> Result<TurnReport, BoardError> {
        let mut report = TurnReport::default();

        loop {
            let matches = find_matches(&self.grid);
            if matches.is_empty() {
                break;
            }

            report.cascades += 1;
            report.cleared += matches.len();
            report.points += self.session.credit_cleared(matches.len());
            self.flush_session();

            let cleared: Vec<Pos> = matches.into_iter().collect();
            for &pos in &cleared {
                self.grid.set(pos, None)?;
                self.events.emit(BoardEvent::CellChanged { pos, symbol: None });
            }
            debug!("Cascade step {}: cleared {} cells", report.cascades, cleared.len());
            self.animator.fade_out(&cleared, self.timings.fade()).await;

            let settled = gravity::resolve(&mut self.grid, &self.symbols, &mut self.rng);
            for pos in settled
                .shifted
                .iter()
                .map(|m| m.to)
                .chain(settled.spawned.iter().map(|s| s.to))
            {
                self.emit_cell(pos)?;
            }

            let falling = self.animator.move_tiles(&settled.shifted, self.timings.fall());
            let spawning = self
                .animator
                .scale_and_respawn(&settled.spawned, self.timings.fall());
            tokio::join!(falling, spawning);
        }

        Ok(report)
    }

    /// Close out a settled turn. Returns `true` if the game ended.
    fn finish_turn(&mut self) -> bool {
        if self.session.latch_game_over() {
            self.flush_session();
            return true;
        }

        if find_possible_swap(&self.grid).is_none() {
            info!("No possible move left, dealing a new board");
            deal_playable(&mut self.grid, &self.symbols, &mut self.rng);
            self.emit_all_cells();
            self.events.emit(BoardEvent::Reshuffled);
        }
        false
    }

    fn lock(&mut self) {
        self.state = TurnState::Locked;
        self.events.emit(BoardEvent::BusyChanged { busy: true });
    }

    fn unlock(&mut self) {
        self.state = if self.session.is_game_over() {
            TurnState::GameOver
        } else {
            TurnState::Idle
        };
        self.events.emit(BoardEvent::BusyChanged { busy: false });
    }

    fn set_selection(&mut self, selection: Option<Pos>) {
        if self.selection == selection {
            return;
        }
        self.selection = selection;
        self.events.emit(BoardEvent::SelectionChanged { selection });
    }

    fn emit_cell(&mut self, pos: Pos) -> Result<(), BoardError> {
        let symbol = self.grid.get(pos)?;
        self.events.emit(BoardEvent::CellChanged { pos, symbol });
        Ok(())
    }

    fn emit_all_cells(&mut self) {
        let positions: Vec<Pos> = self.grid.positions().collect();
        for pos in positions {
            if let Ok(symbol) = self.grid.get(pos) {
                self.events.emit(BoardEvent::CellChanged { pos, symbol });
            }
        }
    }

    fn flush_session(&mut self) {
        for change in self.session.take_changes() {
            match change {
                SessionChange::Score(score) => self.events.emit(BoardEvent::ScoreChanged { score }),
                SessionChange::Moves(moves_remaining) => {
                    self.events.emit(BoardEvent::MovesChanged { moves_remaining })
                }
                SessionChange::GameOver(final_score) => self.report_game_over(final_score),
            }
        }
    }

    fn report_game_over(&mut self, final_score: u32) {
        let previous = self.high_scores.high_score();
        let new_best = final_score > previous;
        if new_best {
            if let Err(e) = self.high_scores.set_high_score(final_score) {
                warn!("Could not save high score {}: {}", final_score, e);
            }
        }
        let high_score = previous.max(final_score);

        info!(
            "Game over: final score {} (best {}{})",
            final_score,
            high_score,
            if new_best { ", new best" } else { "" }
        );
        self.events.emit(BoardEvent::GameOver {
            final_score,
            high_score,
            new_best,
        });
    }
}

/// Reject a prepared board that a dealt board could never be.
fn check_prepared(grid: &Grid, config: &GameConfig, symbols: &SymbolSet) -> Result<(), BoardError> {
    if (grid.width(), grid.height()) != (config.width, config.height) {
        return Err(BoardError::SizeMismatch {
            width: grid.width(),
            height: grid.height(),
            expected_width: config.width,
            expected_height: config.height,
        });
    }

    let empty = grid.empty_count();
    if empty > 0 {
        return Err(BoardError::EmptyCells { count: empty });
    }

    if let Some(symbol) = grid.cells().iter().flatten().find(|s| !symbols.contains(**s)) {
        return Err(BoardError::ForeignSymbol {
            symbol: symbol.as_char(),
        });
    }

    let matched = find_matches(grid).len();
    if matched > 0 {
        return Err(BoardError::PrematchedBoard { cells: matched });
    }
    Ok(())
}

/// Deal until the board has at least one scoring swap.
///
/// Boards too small to ever hold a move keep the last deal.
fn deal_playable(grid: &mut Grid, symbols: &SymbolSet, rng: &mut SymbolRng) {
    for _ in 0..DEAL_ATTEMPTS {
        grid.redeal(symbols, rng);
        if find_possible_swap(grid).is_some() {
            return;
        }
    }
    warn!(
        "No playable {}x{} deal found in {} attempts",
        grid.width(),
        grid.height(),
        DEAL_ATTEMPTS
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Effect, RecordingAnimator};
    use crate::highscore::MemoryHighScore;

    type Controller = TurnController<RecordingAnimator, Vec<BoardEvent>>;

    fn config(moves: u32) -> GameConfig {
        GameConfig {
            width: 4,
            height: 4,
            symbol_count: 4,
            moves,
            seed: Some(7),
            timings: AnimationTimings::uniform(0),
        }
    }

    fn controller(rows: &[&str], moves: u32) -> Controller {
        TurnController::with_grid(
            Grid::from_rows(rows).unwrap(),
            &config(moves),
            RecordingAnimator::new(),
            Vec::new(),
            Box::new(MemoryHighScore::default()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_pick_selects() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 5);
        let out = c.select_cell(Pos::new(1, 1)).await.unwrap();
        assert_eq!(out, TurnOutcome::Selected(Pos::new(1, 1)));
        assert_eq!(c.selection(), Some(Pos::new(1, 1)));
        assert_eq!(
            c.events().last(),
            Some(&BoardEvent::SelectionChanged {
                selection: Some(Pos::new(1, 1))
            })
        );
    }

    #[tokio::test]
    async fn same_pick_deselects() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 5);
        c.select_cell(Pos::new(0, 0)).await.unwrap();
        let out = c.select_cell(Pos::new(0, 0)).await.unwrap();
        assert_eq!(out, TurnOutcome::Deselected);
        assert_eq!(c.selection(), None);
    }

    #[tokio::test]
    async fn out_of_bounds_is_an_error() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 5);
        let err = c.select_cell(Pos::new(4, 0)).await.unwrap_err();
        assert!(matches!(err, BoardError::OutOfBounds { x: 4, y: 0, .. }));
        assert_eq!(c.state(), TurnState::Idle);
    }

    fn prepare(rows: &[&str]) -> Result<Controller, BoardError> {
        TurnController::with_grid(
            Grid::from_rows(rows)?,
            &config(5),
            RecordingAnimator::new(),
            Vec::new(),
            Box::new(MemoryHighScore::default()),
        )
    }

    #[test]
    fn prepared_board_must_match_the_config_size() {
        let err = prepare(&["A", "B", "C", "A", "B", "C"]).err();
        assert_eq!(
            err,
            Some(BoardError::SizeMismatch {
                width: 1,
                height: 6,
                expected_width: 4,
                expected_height: 4,
            })
        );
    }

    #[test]
    fn prepared_board_must_be_full() {
        let err = prepare(&["CDAB", "DCBD", "BDA.", "AABC"]).err();
        assert_eq!(err, Some(BoardError::EmptyCells { count: 1 }));
    }

    #[test]
    fn prepared_board_must_use_configured_symbols() {
        let err = prepare(&["CDAB", "DCBD", "BDAZ", "AABC"]).err();
        assert_eq!(err, Some(BoardError::ForeignSymbol { symbol: 'Z' }));
    }

    #[test]
    fn prepared_board_must_not_hold_a_match() {
        let err = prepare(&["CDAB", "DCBD", "BDAC", "AAAC"]).err();
        assert_eq!(err, Some(BoardError::PrematchedBoard { cells: 3 }));
    }

    #[tokio::test]
    async fn lock_brackets_the_swap() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 5);
        c.select_cell(Pos::new(0, 3)).await.unwrap();
        c.select_cell(Pos::new(1, 3)).await.unwrap();

        let busy: Vec<bool> = c
            .events()
            .iter()
            .filter_map(|e| match e {
                BoardEvent::BusyChanged { busy } => Some(*busy),
                _ => None,
            })
            .collect();
        assert_eq!(busy, vec![true, false]);
        assert_eq!(c.state(), TurnState::Idle);
    }

    #[tokio::test]
    async fn reverted_swap_bounces() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 5);
        let before = c.grid().clone();
        c.select_cell(Pos::new(0, 3)).await.unwrap();
        let out = c.select_cell(Pos::new(1, 3)).await.unwrap();

        assert_eq!(
            out,
            TurnOutcome::Reverted {
                a: Pos::new(0, 3),
                b: Pos::new(1, 3)
            }
        );
        assert_eq!(c.grid(), &before);
        assert_eq!(c.session().moves_remaining(), 5);
        assert!(matches!(
            c.animator().effects().as_slice(),
            [Effect::Move(_), Effect::Yoyo(_, _)]
        ));
    }

    #[tokio::test]
    async fn game_over_ignores_input() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 1);
        c.select_cell(Pos::new(2, 0)).await.unwrap();
        let out = c.select_cell(Pos::new(2, 1)).await.unwrap();
        match out {
            TurnOutcome::Committed(report) => assert!(report.game_over),
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(c.state(), TurnState::GameOver);
        assert_eq!(c.select_cell(Pos::new(0, 0)).await.unwrap(), TurnOutcome::Ignored);
        assert_eq!(c.hint(), None);
    }

    #[tokio::test]
    async fn restart_resets_the_session() {
        let mut c = controller(&["CDAB", "DCBD", "BDAC", "AABC"], 1);
        c.select_cell(Pos::new(2, 0)).await.unwrap();
        c.select_cell(Pos::new(2, 1)).await.unwrap();
        assert_eq!(c.state(), TurnState::GameOver);

        assert!(c.restart(Some(3)));
        assert_eq!(c.state(), TurnState::Idle);
        assert_eq!(c.session().score(), 0);
        assert_eq!(c.session().moves_remaining(), 1);
        assert_eq!(c.seed(), 3);
        assert!(c.grid().is_deal_valid());
    }
}
