//! Store factory for creating record store instances from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};

use super::{
    http::{HttpStore, HttpStoreOptions},
    memory::InMemoryStore,
    RecordStore,
};
use crate::config::StoreConfig;

/// Create a record store from the store configuration.
///
/// # Errors
/// Returns error if:
/// - Backend type is unknown
/// - The public key environment variable is unset for the http backend
/// - The HTTP client cannot be built
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config.backend.as_str() {
        "http" => {
            let public_key = config
                .public_key()
                .ok_or_else(|| anyhow!("Missing public key in environment variable '{}'", config.public_key_env))?;
            let store = HttpStore::new(HttpStoreOptions {
                base_url: config.base_url.clone(),
                project_id: config.project_id.clone(),
                public_key,
                timeout: Duration::from_secs(config.timeout_secs),
            })?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        _ => Err(anyhow!("Unknown store backend: {}", config.backend)),
    }
}
