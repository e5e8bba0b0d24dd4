//! Event channel built on crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sending half handed to the engine.
///
/// A detached sender has no channel behind it and drops every event, so a
/// headless run pays nothing for progress reporting.
#[derive(Clone, Default)]
pub struct EventSender {
    inner: Option<Sender<Event>>,
}

impl EventSender {
    /// A sender that discards everything
    pub fn detached() -> Self {
        Self { inner: None }
    }

    /// Whether anyone can still receive events
    pub fn is_listening(&self) -> bool {
        self.inner.is_some()
    }

    /// Send an event. Dropped if detached or the receiver is gone.
    pub fn send(&self, event: Event) {
        if let Some(sender) = &self.inner {
            let _ = sender.send(event);
        }
    }
}

/// Receiving half, owned by the UI thread.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Next event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Blocks for each event until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Connected sender/receiver pairs.
pub struct EventChannel;

impl EventChannel {
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender {
                inner: Some(sender),
            },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender for runs without a UI
pub fn null_sender() -> EventSender {
    EventSender::detached()
}
