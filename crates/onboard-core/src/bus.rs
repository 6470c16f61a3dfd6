//! Typed in-process publish/subscribe.
//!
//! Replaces stringly-named process-wide notifications with a typed fan-out.
//! Subscriptions are keyed by subscriber identity: subscribing again under
//! the same identity replaces the previous subscription, so one handler can
//! never be wired up twice for the same event. Unrelated subscribers are
//! untouched.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Enrollment lifecycle events published by the management SDK boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentEvent {
    Succeeded,
    Failed { reason: String },
    StatusChanged,
}

/// Identity-keyed event fan-out. Clones share the subscriber table.
#[derive(Clone)]
pub struct EventBus<T> {
    subscribers: Arc<Mutex<Vec<(String, Sender<T>)>>>,
}

impl<T: Clone> EventBus<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe under `id`, replacing any prior subscription for the same
    /// id. Events published after this call are delivered to the returned
    /// receiver.
    pub fn subscribe(&self, id: &str) -> Receiver<T> {
        let (tx, rx) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|(existing, _)| existing != id);
            subscribers.push((id.to_string(), tx));
        }
        rx
    }

    /// Drop `id`'s subscription. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: &str) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|(existing, _)| existing != id);
        }
    }

    /// Deliver `event` to every live subscriber. Subscribers whose receiver
    /// has been dropped are pruned on the way through.
    pub fn publish(&self, event: T) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|(id, tx)| {
                if tx.send(event.clone()).is_ok() {
                    true
                } else {
                    log::debug!("event bus: pruning disconnected subscriber '{}'", id);
                    false
                }
            });
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl<T: Clone> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
