//! Repository layer for record store operations.
//!
//! [`Repository`] implements the uniform operations once for every
//! [`Entity`]; the entity modules add the operations specific to crops,
//! tasks and financial entries. Every public operation comes in two forms:
//! `try_*` returns the cause of a failure, the plain form logs it and
//! degrades to an empty list, `None`, `false` or a zeroed value.

pub mod bulk;
pub mod financial_entry;
pub mod task;

use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, error, warn};

use crate::backend::{BulkResponse, Condition, Operator, Query, RecordStore, StoreError, StoreHandle};
use crate::constants::{ERROR_STORE_UNAVAILABLE, FIELD_ID};
use crate::entities::{Crop, Entity, Farm, FarmScoped, FinancialEntry, Task};
use crate::notify::Notifier;
use crate::schema::{map_record, to_record, IntoRecordId, MappingError};

pub use bulk::BulkOutcome;

pub type FarmRepository = Repository<Farm>;
pub type CropRepository = Repository<Crop>;
pub type TaskRepository = Repository<Task>;
pub type FinancialRepository = Repository<FinancialEntry>;

/// Why a repository operation failed.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{}", ERROR_STORE_UNAVAILABLE)]
    Unavailable,

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("All {failed} records failed")]
    NoRecordSucceeded { failed: usize },

    #[error("Response carried no per-record results")]
    MissingResults,

    #[error("Successful result carried no record data")]
    MissingData,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Whether a rejected request is also reported to the notifier.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Report {
    Notify,
    LogOnly,
}

/// Schema-mapped CRUD access to one entity's table.
pub struct Repository<E: Entity> {
    store: StoreHandle,
    notifier: Arc<dyn Notifier>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            notifier: Arc::clone(&self.notifier),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: StoreHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            _entity: PhantomData,
        }
    }

    fn client(&self) -> Result<Arc<dyn RecordStore>, RepositoryError> {
        self.store.resolve().ok_or(RepositoryError::Unavailable)
    }

    fn table(&self) -> &'static str {
        E::schema().table
    }

    fn query(&self) -> Query {
        Query::select(E::schema().selection())
    }

    fn accept(&self, success: bool, message: Option<String>, report: Report) -> Result<(), RepositoryError> {
        if success {
            return Ok(());
        }
        let message = message.unwrap_or_else(|| "Request rejected by record store".to_string());
        if report == Report::Notify {
            self.notifier.error(&message);
        }
        Err(RepositoryError::Rejected(message))
    }

    /// Check a bulk response and keep the records that succeeded.
    fn settle(&self, action: &str, response: BulkResponse) -> Result<BulkOutcome, RepositoryError> {
        self.accept(response.success, response.message, Report::Notify)?;
        let results = response.results.ok_or(RepositoryError::MissingResults)?;
        let outcome = BulkOutcome::partition(results);

        if !outcome.failed.is_empty() {
            warn!("Failed to {} {} {} records", action, outcome.failed.len(), E::KIND);
            outcome.report(self.notifier.as_ref());
        }
        if !outcome.any_succeeded() {
            return Err(RepositoryError::NoRecordSucceeded {
                failed: outcome.failed.len(),
            });
        }
        Ok(outcome)
    }

    fn first_record(&self, outcome: BulkOutcome) -> Result<E, RepositoryError> {
        let data = outcome
            .succeeded
            .into_iter()
            .next()
            .and_then(|r| r.data)
            .ok_or(RepositoryError::MissingData)?;
        Ok(map_record(&data, E::schema())?)
    }

    async fn fetch(&self, query: &Query, report: Report) -> Result<Vec<E>, RepositoryError> {
        let client = self.client()?;
        let response = client.fetch_records(self.table(), query).await?;
        self.accept(response.success, response.message, report)?;

        let rows = response.data.unwrap_or_default();
        debug!("Fetched {} {} records from {}", rows.len(), E::KIND, self.table());
        rows.iter()
            .map(|row| map_record(row, E::schema()).map_err(RepositoryError::from))
            .collect()
    }

    pub async fn try_get_all(&self) -> Result<Vec<E>, RepositoryError> {
        self.fetch(&self.query(), Report::Notify).await
    }

    /// All records in store order; empty on failure.
    pub async fn get_all(&self) -> Vec<E> {
        self.try_get_all().await.unwrap_or_else(|e| {
            error!("Error fetching {} records: {}", E::KIND, e);
            Vec::new()
        })
    }

    pub async fn try_get_by_id(&self, id: impl IntoRecordId) -> Result<Option<E>, RepositoryError> {
        let client = self.client()?;
        let id = id.into_record_id()?;
        let response = client.get_record_by_id(self.table(), id, &self.query()).await?;
        self.accept(response.success, response.message, Report::LogOnly)?;

        match response.data {
            Some(record) => Ok(Some(map_record(&record, E::schema())?)),
            None => Ok(None),
        }
    }

    /// One record, or `None` when it does not exist or the call fails.
    pub async fn get_by_id(&self, id: impl IntoRecordId) -> Option<E> {
        self.try_get_by_id(id).await.unwrap_or_else(|e| {
            error!("Error fetching {}: {}", E::KIND, e);
            None
        })
    }

    pub async fn try_create(&self, draft: &E::Draft) -> Result<E, RepositoryError> {
        let client = self.client()?;
        let mut record = to_record(draft, E::schema())?;
        E::prepare_create(&mut record);

        let response = client.create_records(self.table(), vec![record]).await?;
        let outcome = self.settle("create", response)?;
        self.first_record(outcome)
    }

    /// Create a record and return it with its server-assigned id.
    pub async fn create(&self, draft: &E::Draft) -> Option<E> {
        match self.try_create(draft).await {
            Ok(created) => Some(created),
            Err(e) => {
                error!("Error creating {}: {}", E::KIND, e);
                None
            }
        }
    }

    pub async fn try_update(&self, id: impl IntoRecordId, draft: &E::Draft) -> Result<E, RepositoryError> {
        let client = self.client()?;
        let id = id.into_record_id()?;
        let mut record = to_record(draft, E::schema())?;
        record.insert(FIELD_ID.to_string(), id.into());

        let response = client.update_records(self.table(), vec![record]).await?;
        let outcome = self.settle("update", response)?;
        self.first_record(outcome)
    }

    /// Replace every mapped field of a record with the draft's values.
    pub async fn update(&self, id: impl IntoRecordId, draft: &E::Draft) -> Option<E> {
        match self.try_update(id, draft).await {
            Ok(updated) => Some(updated),
            Err(e) => {
                error!("Error updating {}: {}", E::KIND, e);
                None
            }
        }
    }

    pub async fn try_delete(&self, id: impl IntoRecordId) -> Result<(), RepositoryError> {
        let client = self.client()?;
        let id = id.into_record_id()?;

        let response = client.delete_records(self.table(), vec![id]).await?;
        self.settle("delete", response)?;
        Ok(())
    }

    /// `true` when the store confirmed the deletion.
    pub async fn delete(&self, id: impl IntoRecordId) -> bool {
        match self.try_delete(id).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error deleting {}: {}", E::KIND, e);
                false
            }
        }
    }
}

impl<E: FarmScoped> Repository<E> {
    pub async fn try_get_by_farm_id(&self, farm_id: impl IntoRecordId) -> Result<Vec<E>, RepositoryError> {
        self.client()?;
        let farm_id = farm_id.into_record_id()?;
        let query = self
            .query()
            .filter(Condition::new(E::FARM_FIELD, Operator::EqualTo, farm_id));
        self.fetch(&query, Report::LogOnly).await
    }

    /// Records that belong to the given farm; empty on failure.
    pub async fn get_by_farm_id(&self, farm_id: impl IntoRecordId) -> Vec<E> {
        self.try_get_by_farm_id(farm_id).await.unwrap_or_else(|e| {
            error!("Error fetching {} records by farm: {}", E::KIND, e);
            Vec::new()
        })
    }
}
