//! Turn engine - async orchestration around the core board rules
//!
//! The engine owns one game's mutable state and drives each turn through its
//! visual steps, awaiting an [`Animator`] between them and reporting every
//! observable change to an [`EventSink`].
//!
//! # Module Structure
//!
//! | Module | Role |
//! |--------|------|
//! | [`turn`] | selection, lock, swap protocol, cascade loop, game over |
//! | [`animation`] | the animator contract and headless/timed/recording animators |
//! | [`events`] | event sinks (in-memory, shared log, channel) |
//! | [`highscore`] | best-score storage (memory or JSON file) |
//! | [`config`] | board size, symbols, move budget, seed, animation timings |
//! | [`runtime`] | tokio task plus command queue, busy flag, [`GameHandle`] |
//!
//! # Example
//!
//! ```
//! use match3_engine::{GameConfig, InstantAnimator, MemoryHighScore, TurnController};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = GameConfig { seed: Some(42), ..GameConfig::default() };
//! let mut game = TurnController::new(
//!     &config,
//!     InstantAnimator,
//!     Vec::new(),
//!     Box::new(MemoryHighScore::default()),
//! )
//! .unwrap();
//!
//! let (a, b) = game.hint().expect("a fresh deal always has a move");
//! game.select_cell(a).await.unwrap();
//! game.select_cell(b).await.unwrap();
//!
//! assert!(game.session().score() >= 30);
//! assert_eq!(game.session().moves_remaining(), config.moves - 1);
//! # });
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod events;
pub mod highscore;
pub mod runtime;
pub mod turn;

pub use animation::{Animator, Completion, CompletionHandle, InstantAnimator, TimedAnimator};
pub use animation::{Effect, RecordingAnimator};
pub use config::{AnimationTimings, GameConfig};
pub use error::EngineError;
pub use events::EventSink;
pub use highscore::{HighScoreStore, JsonFileHighScore, MemoryHighScore};
pub use runtime::{spawn_game, BusyTap, GameCommand, GameHandle, DEFAULT_MAX_PENDING};
pub use turn::{TurnController, TurnOutcome, TurnReport};
