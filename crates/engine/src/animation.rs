//! Animation collaborator contract
//!
//! The engine never draws anything. At each visual step of a turn it asks an
//! [`Animator`] for an effect and awaits the returned [`Completion`]. The
//! board is never mutated while a completion is pending.
//!
//! A completion whose sender is dropped counts as finished; there are no
//! timeouts.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

use match3_core::{Spawn, TileMove};
use match3_types::Pos;

/// Signal that an effect has finished.
#[derive(Debug)]
pub struct Completion {
    rx: Option<oneshot::Receiver<()>>,
}

impl Completion {
    /// An effect that is already done.
    pub fn ready() -> Self {
        Self { rx: None }
    }

    /// A pending effect and the handle that finishes it.
    pub fn pending() -> (CompletionHandle, Self) {
        let (tx, rx) = oneshot::channel();
        (CompletionHandle { tx }, Self { rx: Some(rx) })
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.rx.as_mut() {
            None => Poll::Ready(()),
            Some(rx) => Pin::new(rx).poll(cx).map(|_| ()),
        }
    }
}

/// Finishes a pending [`Completion`].
#[derive(Debug)]
pub struct CompletionHandle {
    tx: oneshot::Sender<()>,
}

impl CompletionHandle {
    pub fn complete(self) {
        let _ = self.tx.send(());
    }
}

/// Visual effects requested by the turn controller.
pub trait Animator: Send {
    /// Slide tiles between cells.
    fn move_tiles(&mut self, moves: &[TileMove], duration: Duration) -> Completion;

    /// Move `a` and `b` toward each other and back.
    fn yoyo_tiles(&mut self, a: Pos, b: Pos, duration: Duration) -> Completion;

    /// Fade out cleared tiles.
    fn fade_out(&mut self, cells: &[Pos], duration: Duration) -> Completion;

    /// Bring new tiles in from above the board.
    fn scale_and_respawn(&mut self, spawns: &[Spawn], duration: Duration) -> Completion;
}

/// Completes every effect immediately. For headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn move_tiles(&mut self, _moves: &[TileMove], _duration: Duration) -> Completion {
        Completion::ready()
    }

    fn yoyo_tiles(&mut self, _a: Pos, _b: Pos, _duration: Duration) -> Completion {
        Completion::ready()
    }

    fn fade_out(&mut self, _cells: &[Pos], _duration: Duration) -> Completion {
        Completion::ready()
    }

    fn scale_and_respawn(&mut self, _spawns: &[Spawn], _duration: Duration) -> Completion {
        Completion::ready()
    }
}

/// Completes each effect after its duration on the tokio clock.
///
/// Must be driven from inside a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedAnimator;

impl TimedAnimator {
    fn after(duration: Duration) -> Completion {
        if duration.is_zero() {
            return Completion::ready();
        }
        let (handle, completion) = Completion::pending();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            handle.complete();
        });
        completion
    }
}

impl Animator for TimedAnimator {
    fn move_tiles(&mut self, moves: &[TileMove], duration: Duration) -> Completion {
        if moves.is_empty() {
            return Completion::ready();
        }
        Self::after(duration)
    }

    fn yoyo_tiles(&mut self, _a: Pos, _b: Pos, duration: Duration) -> Completion {
        // There and back.
        Self::after(duration * 2)
    }

    fn fade_out(&mut self, cells: &[Pos], duration: Duration) -> Completion {
        if cells.is_empty() {
            return Completion::ready();
        }
        Self::after(duration)
    }

    fn scale_and_respawn(&mut self, spawns: &[Spawn], duration: Duration) -> Completion {
        if spawns.is_empty() {
            return Completion::ready();
        }
        Self::after(duration)
    }
}

/// One requested effect, as seen by [`RecordingAnimator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Move(Vec<TileMove>),
    Yoyo(Pos, Pos),
    Fade(Vec<Pos>),
    Respawn(Vec<Spawn>),
}

/// Completes immediately and remembers every request.
///
/// Clones share the same log, so a test can keep one clone while the
/// controller owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    effects: Arc<Mutex<Vec<Effect>>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every effect requested so far.
    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut effects) = self.effects.lock() {
            effects.clear();
        }
    }

    fn record(&self, effect: Effect) -> Completion {
        if let Ok(mut effects) = self.effects.lock() {
            effects.push(effect);
        }
        Completion::ready()
    }
}

impl Animator for RecordingAnimator {
    fn move_tiles(&mut self, moves: &[TileMove], _duration: Duration) -> Completion {
        self.record(Effect::Move(moves.to_vec()))
    }

    fn yoyo_tiles(&mut self, a: Pos, b: Pos, _duration: Duration) -> Completion {
        self.record(Effect::Yoyo(a, b))
    }

    fn fade_out(&mut self, cells: &[Pos], _duration: Duration) -> Completion {
        self.record(Effect::Fade(cells.to_vec()))
    }

    fn scale_and_respawn(&mut self, spawns: &[Spawn], _duration: Duration) -> Completion {
        self.record(Effect::Respawn(spawns.to_vec()))
    }
}
