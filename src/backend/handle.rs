//! Shared, lazily-populated slot for the record store client.

use std::sync::{Arc, RwLock};

use super::RecordStore;

/// Handle the repositories resolve before every call.
///
/// Clones share the same slot: installing a client through one clone makes
/// it visible to every repository built from any other clone.
#[derive(Clone, Default)]
pub struct StoreHandle {
    slot: Arc<RwLock<Option<Arc<dyn RecordStore>>>>,
}

impl StoreHandle {
    /// A handle with no client installed yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(store))),
        }
    }

    /// Install (or replace) the client.
    pub fn install(&self, store: Arc<dyn RecordStore>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(store);
        }
    }

    /// Drop the client, e.g. after the session ends.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = None;
        }
    }

    /// Current client, if one is installed.
    pub fn resolve(&self) -> Option<Arc<dyn RecordStore>> {
        self.slot.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_available(&self) -> bool {
        self.resolve().is_some()
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store_type = self.resolve().map(|store| store.store_type().to_string());
        f.debug_struct("StoreHandle").field("store", &store_type).finish()
    }
}
