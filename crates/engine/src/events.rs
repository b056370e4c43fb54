//! Event delivery to UI collaborators.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use match3_types::BoardEvent;

/// Receives [`BoardEvent`]s as the controller produces them.
///
/// Emission never fails from the controller's point of view: a sink whose
/// consumer has gone away simply drops the event.
pub trait EventSink: Send {
    fn emit(&mut self, event: BoardEvent);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&mut self, _event: BoardEvent) {}
}

/// Collects events in memory.
impl EventSink for Vec<BoardEvent> {
    fn emit(&mut self, event: BoardEvent) {
        self.push(event);
    }
}

/// Collects events in a log shared with another owner.
impl EventSink for Arc<Mutex<Vec<BoardEvent>>> {
    fn emit(&mut self, event: BoardEvent) {
        if let Ok(mut events) = self.lock() {
            events.push(event);
        }
    }
}

impl EventSink for mpsc::UnboundedSender<BoardEvent> {
    fn emit(&mut self, event: BoardEvent) {
        let _ = self.send(event);
    }
}
