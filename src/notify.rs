//! User-facing notification channel.
//!
//! Repositories report human-readable error strings here (the toast
//! surface of a UI). Delivery is fire-and-forget and never affects an
//! operation's return value.

use log::warn;
use std::sync::{Arc, Mutex};

/// Sink for user-visible error messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that forwards messages to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        warn!(target: "farmdesk::notify", "{}", message);
    }
}

/// Notifier that keeps messages in memory, for display or inspection.
#[derive(Clone, Debug, Default)]
pub struct MemoryNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were reported
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all messages
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
