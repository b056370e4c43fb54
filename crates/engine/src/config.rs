//! Game configuration
//!
//! A [`GameConfig`] can be built from defaults, from JSON, or from
//! environment variables:
//!
//! - `MATCH3_WIDTH` / `MATCH3_HEIGHT`: board size in cells (default 8x8)
//! - `MATCH3_SYMBOLS`: number of distinct symbols (default 6, minimum 3)
//! - `MATCH3_MOVES`: move budget (default 30)
//! - `MATCH3_SEED`: fixed RNG seed (default: random)
//! - `MATCH3_TWEEN_MS`: duration of every tween (default 250)
//!
//! Unset variables keep their default; a variable that is set but does not
//! parse is an error.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use match3_core::{BoardError, SymbolSet};
use match3_types::{DEFAULT_HEIGHT, DEFAULT_MOVES, DEFAULT_SYMBOLS, DEFAULT_TWEEN_MS, DEFAULT_WIDTH};

use crate::error::EngineError;

/// Durations handed to the animation collaborator, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTimings {
    /// Two tiles moving onto each other's cell.
    pub swap_ms: u64,
    /// One leg of the bounce shown for a swap that made no match.
    pub yoyo_ms: u64,
    /// Matched tiles fading out.
    pub fade_ms: u64,
    /// Shifted and spawned tiles settling after gravity.
    pub fall_ms: u64,
}

impl AnimationTimings {
    /// Every tween takes `ms` milliseconds.
    pub fn uniform(ms: u64) -> Self {
        Self {
            swap_ms: ms,
            yoyo_ms: ms,
            fade_ms: ms,
            fall_ms: ms,
        }
    }

    pub fn swap(&self) -> Duration {
        Duration::from_millis(self.swap_ms)
    }

    pub fn yoyo(&self) -> Duration {
        Duration::from_millis(self.yoyo_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn fall(&self) -> Duration {
        Duration::from_millis(self.fall_ms)
    }
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self::uniform(DEFAULT_TWEEN_MS)
    }
}

/// Everything needed to start a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub symbol_count: u8,
    pub moves: u32,
    /// Fixed seed for reproducible games; `None` picks one at random.
    pub seed: Option<u64>,
    pub timings: AnimationTimings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            symbol_count: DEFAULT_SYMBOLS,
            moves: DEFAULT_MOVES,
            seed: None,
            timings: AnimationTimings::default(),
        }
    }
}

impl GameConfig {
    /// Read overrides from `MATCH3_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "MATCH3_WIDTH")? {
            config.width = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_HEIGHT")? {
            config.height = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_SYMBOLS")? {
            config.symbol_count = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_MOVES")? {
            config.moves = v;
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_SEED")? {
            config.seed = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "MATCH3_TWEEN_MS")? {
            config.timings = AnimationTimings::uniform(v);
        }

        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the configuration and build its symbol set.
    pub fn validate(&self) -> Result<SymbolSet, BoardError> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.moves == 0 {
            return Err(BoardError::NoMoves);
        }
        SymbolSet::with_count(self.symbol_count)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, EngineError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| EngineError::Config { key, value: raw })
        }
    }
}
