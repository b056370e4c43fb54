//! High score persistence
//!
//! The engine only needs a single integer: read it at game over, write it
//! back when the final score beats it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Storage for the best score.
pub trait HighScoreStore: Send {
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32) -> Result<(), EngineError>;
}

/// In-memory store; forgotten when dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryHighScore {
    best: u32,
}

impl MemoryHighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), EngineError> {
        self.best = score;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Store backed by a small JSON file.
///
/// A missing file reads as zero. An unreadable or corrupt file is logged and
/// also reads as zero, so a damaged save never stops a game from ending.
#[derive(Debug, Clone)]
pub struct JsonFileHighScore {
    path: PathBuf,
    record: HighScoreRecord,
}

impl JsonFileHighScore {
    /// Open the store, loading the current value if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let record = match Self::load(&path) {
            Ok(Some(record)) => {
                info!("Loaded high score {} from {}", record.high_score, path.display());
                record
            }
            Ok(None) => {
                info!("No high score at {}, starting fresh", path.display());
                HighScoreRecord::default()
            }
            Err(e) => {
                warn!("Ignoring unreadable high score file {}: {}", path.display(), e);
                HighScoreRecord::default()
            }
        };
        Self { path, record }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Option<HighScoreRecord>, EngineError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }
}

impl HighScoreStore for JsonFileHighScore {
    fn high_score(&self) -> u32 {
        self.record.high_score
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), EngineError> {
        let record = HighScoreRecord { high_score: score };
        let json = serde_json::to_string(&record)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        self.record = record;
        info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}
