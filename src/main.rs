//! Headless match-3 runner (default binary).
//!
//! Plays one game by always taking the hinted swap and prints the result.
//! Configuration comes from `MATCH3_*` environment variables, overridden by
//! flags: `--seed N --moves N --width N --height N --symbols N
//! --highscore PATH --animate`.

use anyhow::{Context, Result};
use log::debug;
use tokio::sync::mpsc;

use match3::autoplay::{autoplay, parse_autoplay_args, AutoplayResult};
use match3::engine::{GameConfig, InstantAnimator, TimedAnimator, TurnController};
use match3::types::{BoardEvent, Pos};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_autoplay_args(&args)?;

    let mut config = GameConfig::from_env().context("reading MATCH3_* environment")?;
    args.apply(&mut config);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<BoardEvent>();
    let logger = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            debug!("event: {:?}", event);
        }
    });

    let store = args.high_score_store();
    let result = if args.animate {
        let controller = TurnController::new(&config, TimedAnimator, events_tx, store)?;
        autoplay(controller).await?
    } else {
        let controller = TurnController::new(&config, InstantAnimator, events_tx, store)?;
        autoplay(controller).await?
    };
    logger.await.ok();

    print_result(&result);
    Ok(())
}

fn print_result(result: &AutoplayResult) {
    let snap = &result.snapshot;
    for y in (0..snap.height).rev() {
        let row: String = (0..snap.width)
            .map(|x| match snap.cell(Pos::new(x as i16, y as i16)).flatten() {
                Some(symbol) => symbol.as_char(),
                None => '.',
            })
            .collect();
        println!("{}", row);
    }
    println!(
        "seed {} | turns {} | score {} | moves left {} | {}",
        snap.seed,
        result.turns,
        snap.score,
        snap.moves_remaining,
        snap.state.as_str()
    );
}
