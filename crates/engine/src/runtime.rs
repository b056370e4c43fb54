//! Game runtime integration.
//!
//! Moves a [`TurnController`] into its own tokio task and feeds it through a
//! bounded command queue, so exactly one transition is in flight at a time.
//!
//! Selections that arrive while a turn is locked are dropped: at the handle
//! when the busy flag is already up or the queue is full, and in the task when
//! a locked turn finishes with selections still queued behind it. Other
//! commands (snapshots, hints, restarts) queued during a turn are answered
//! after it.

use std::collections::VecDeque;

use log::debug;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use match3_core::BoardSnapshot;
use match3_types::{BoardEvent, Pos};

use crate::animation::Animator;
use crate::error::EngineError;
use crate::events::EventSink;
use crate::turn::TurnController;

/// Default capacity of the command queue.
pub const DEFAULT_MAX_PENDING: usize = 16;

/// Command delivered to the game task.
#[derive(Debug)]
pub enum GameCommand {
    Select(Pos),
    Snapshot(oneshot::Sender<BoardSnapshot>),
    Hint(oneshot::Sender<Option<(Pos, Pos)>>),
    Restart {
        seed: Option<u64>,
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// Event sink wrapper that mirrors `BusyChanged` into a watch channel.
///
/// Going busy is published at once. Going idle is held back until
/// [`BusyTap::release`], so the runtime can clear out input queued during the
/// turn before the handle starts accepting selections again.
#[derive(Debug)]
pub struct BusyTap<S> {
    inner: S,
    busy: watch::Sender<bool>,
    idle_pending: bool,
}

impl<S> BusyTap<S> {
    pub fn new(inner: S, busy: watch::Sender<bool>) -> Self {
        Self {
            inner,
            busy,
            idle_pending: false,
        }
    }

    /// Publish a held-back idle transition, if any.
    pub fn release(&mut self) {
        if self.idle_pending {
            self.idle_pending = false;
            self.busy.send_replace(false);
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for BusyTap<S> {
    fn emit(&mut self, event: BoardEvent) {
        if let BoardEvent::BusyChanged { busy } = event {
            if busy {
                self.idle_pending = false;
                self.busy.send_replace(true);
            } else {
                self.idle_pending = true;
            }
        }
        self.inner.emit(event);
    }
}

/// Cheap handle to a running game.
#[derive(Debug, Clone)]
pub struct GameHandle {
    cmd_tx: mpsc::Sender<GameCommand>,
    busy: watch::Receiver<bool>,
}

impl GameHandle {
    /// Queue a selection.
    ///
    /// Returns `false` if the input was dropped because the game is busy, the
    /// queue is full, or the task has stopped.
    pub fn select_cell(&self, pos: Pos) -> bool {
        if *self.busy.borrow() {
            debug!("Dropping selection at {}: busy", pos);
            return false;
        }
        self.cmd_tx.try_send(GameCommand::Select(pos)).is_ok()
    }

    /// Board state as of the end of the current turn.
    pub async fn snapshot(&self) -> Result<BoardSnapshot, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.send(GameCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    pub async fn hint(&self) -> Result<Option<(Pos, Pos)>, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.send(GameCommand::Hint(tx)).await?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// Start over with a new board. `Ok(false)` if refused.
    pub async fn restart(&self, seed: Option<u64>) -> Result<bool, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.send(GameCommand::Restart { seed, reply: tx }).await?;
        rx.await.map_err(|_| EngineError::Closed)
    }

    /// Ask the task to stop once the current turn has settled.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.send(GameCommand::Shutdown).await
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Watch channel that is `true` while a turn is locked.
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.clone()
    }

    async fn send(&self, cmd: GameCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(cmd).await.map_err(|_| EngineError::Closed)
    }
}

/// Spawn the game task.
///
/// The task ends on [`GameHandle::shutdown`] or when every handle is dropped,
/// and hands the controller back through the join handle.
pub fn spawn_game<A, S>(
    controller: TurnController<A, S>,
    max_pending: usize,
) -> (GameHandle, JoinHandle<TurnController<A, BusyTap<S>>>)
where
    A: Animator + 'static,
    S: EventSink + 'static,
{
    let (busy_tx, busy_rx) = watch::channel(false);
    let (cmd_tx, cmd_rx) = mpsc::channel(max_pending.max(1));
    let controller = controller.map_events(|events| BusyTap::new(events, busy_tx));

    let task = tokio::spawn(run_game(controller, cmd_rx));
    (
        GameHandle {
            cmd_tx,
            busy: busy_rx,
        },
        task,
    )
}

async fn run_game<A, S>(
    mut controller: TurnController<A, BusyTap<S>>,
    mut cmd_rx: mpsc::Receiver<GameCommand>,
) -> TurnController<A, BusyTap<S>>
where
    A: Animator,
    S: EventSink,
{
    let mut backlog: VecDeque<GameCommand> = VecDeque::new();

    loop {
        let cmd = match backlog.pop_front() {
            Some(cmd) => cmd,
            None => match cmd_rx.recv().await {
                Some(cmd) => cmd,
                None => break,
            },
        };

        match cmd {
            GameCommand::Select(pos) => {
                match controller.select_cell(pos).await {
                    Ok(outcome) if outcome.locked() => drain_selections(&mut cmd_rx, &mut backlog),
                    Ok(_) => {}
                    Err(e) => debug!("Selection at {} rejected: {}", pos, e),
                }
                // Only now may the handle accept selections again.
                controller.events_mut().release();
            }
            GameCommand::Snapshot(reply) => {
                let _ = reply.send(controller.snapshot());
            }
            GameCommand::Hint(reply) => {
                let _ = reply.send(controller.hint());
            }
            GameCommand::Restart { seed, reply } => {
                let _ = reply.send(controller.restart(seed));
            }
            GameCommand::Shutdown => break,
        }
    }

    debug!("Game task stopped");
    controller
}

/// Drop selections queued during a locked turn; keep everything else in order.
fn drain_selections(
    cmd_rx: &mut mpsc::Receiver<GameCommand>,
    backlog: &mut VecDeque<GameCommand>,
) {
    let mut dropped = 0usize;
    while let Ok(cmd) = cmd_rx.try_recv() {
        match cmd {
            GameCommand::Select(_) => dropped += 1,
            other => backlog.push_back(other),
        }
    }
    if dropped > 0 {
        debug!("Dropped {} selection(s) queued while busy", dropped);
    }
}
