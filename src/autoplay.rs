//! Headless autoplay.
//!
//! Plays a full game through the command-queue runtime by always taking the
//! first hinted swap, then reports the final result.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};

use crate::core::BoardSnapshot;
use crate::engine::{
    spawn_game, Animator, EventSink, GameConfig, GameHandle, HighScoreStore, JsonFileHighScore,
    MemoryHighScore, TurnController, DEFAULT_MAX_PENDING,
};
use crate::types::TurnState;

/// Command-line overrides on top of [`GameConfig::from_env`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoplayArgs {
    pub seed: Option<u64>,
    pub moves: Option<u32>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub symbols: Option<u8>,
    pub highscore: Option<PathBuf>,
    /// Pace turns with the configured animation timings.
    pub animate: bool,
}

impl AutoplayArgs {
    pub fn apply(&self, config: &mut GameConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(moves) = self.moves {
            config.moves = moves;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(symbols) = self.symbols {
            config.symbol_count = symbols;
        }
    }

    pub fn high_score_store(&self) -> Box<dyn HighScoreStore> {
        match &self.highscore {
            Some(path) => Box::new(JsonFileHighScore::open(path)),
            None => Box::new(MemoryHighScore::default()),
        }
    }
}

pub fn parse_autoplay_args(args: &[String]) -> Result<AutoplayArgs> {
    let mut parsed = AutoplayArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => parsed.seed = Some(parse_value(args, &mut i)?),
            "--moves" => parsed.moves = Some(parse_value(args, &mut i)?),
            "--width" => parsed.width = Some(parse_value(args, &mut i)?),
            "--height" => parsed.height = Some(parse_value(args, &mut i)?),
            "--symbols" => parsed.symbols = Some(parse_value(args, &mut i)?),
            "--highscore" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --highscore"))?;
                parsed.highscore = Some(PathBuf::from(v));
            }
            "--animate" => parsed.animate = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize) -> Result<T> {
    let flag = &args[*i];
    *i += 1;
    let v = args
        .get(*i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
    v.parse::<T>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

/// Final state of an autoplayed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoplayResult {
    pub turns: u32,
    pub snapshot: BoardSnapshot,
}

/// Spawn `controller` and play it until game over or until no swap is left.
pub async fn autoplay<A, S>(controller: TurnController<A, S>) -> Result<AutoplayResult>
where
    A: Animator + 'static,
    S: EventSink + 'static,
{
    let (handle, task) = spawn_game(controller, DEFAULT_MAX_PENDING);
    let result = play(&handle).await;
    handle.shutdown().await.ok();
    task.await.context("game task panicked")?;
    result
}

async fn play(handle: &GameHandle) -> Result<AutoplayResult> {
    let mut turns = 0u32;
    loop {
        let snapshot = handle.snapshot().await?;
        if snapshot.state == TurnState::GameOver {
            info!("Autoplay finished after {} turns", turns);
            return Ok(AutoplayResult { turns, snapshot });
        }

        let Some((a, b)) = handle.hint().await? else {
            info!("No swap available after {} turns, stopping", turns);
            return Ok(AutoplayResult { turns, snapshot });
        };

        debug!("Turn {}: swapping {} <-> {}", turns + 1, a, b);
        if !handle.select_cell(a) || !handle.select_cell(b) {
            return Err(anyhow!("game rejected the hinted swap {} <-> {}", a, b));
        }
        turns += 1;
    }
}
