use thiserror::Error;

use match3_core::BoardError;

/// Errors raised by the engine layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("high score store: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },

    #[error("game task has shut down")]
    Closed,
}
