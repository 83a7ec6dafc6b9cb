//! Domain entities and their record schemas.
//!
//! Each entity module defines the domain object, the draft used to create
//! or update it, and the fixed field mapping to its external table.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::Record;
use crate::schema::Schema;

pub mod crop;
pub mod farm;
pub mod financial_entry;
pub mod task;

pub use crop::{Crop, CropDraft};
pub use farm::{Farm, FarmDraft};
pub use financial_entry::{FinancialEntry, FinancialEntryDraft, FinancialSummary};
pub use task::{Task, TaskDraft};

/// Binds a domain type to its table and mapping.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Domain-shaped input for create and update.
    type Draft: Serialize + Send + Sync;

    /// Singular name used in log messages.
    const KIND: &'static str;

    fn schema() -> &'static Schema;

    /// Fix up a freshly mapped record before it is created.
    fn prepare_create(_record: &mut Record) {}
}

/// Entities that reference a farm through a relation column.
pub trait FarmScoped: Entity {
    const FARM_FIELD: &'static str = "farmId_c";
}
