//! Record store abstraction layer.
//!
//! This module defines the interface the repositories use to reach the hosted
//! record store, along with the query language and the response envelopes the
//! store speaks. Records travel as flat JSON objects keyed by external field
//! names; mapping them to domain types is the job of [`crate::schema`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod factory;
pub mod handle;
pub mod http;
pub mod memory;

pub use handle::StoreHandle;

/// A flat external record as stored remotely.
pub type Record = Map<String, Value>;

/// Transport-level errors raised by a store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store error: {0}")]
    Other(String),
}

/// Comparison operators understood by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    LessThanOrEqualTo,
    GreaterThanOrEqualTo,
}

/// A single `where` predicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl Condition {
    pub fn new(field_name: &str, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.to_string(),
            operator,
            values: vec![value.into()],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

/// Ordering key for fetch queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

/// Selected field, serialized as `{"field": {"Name": "..."}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub field: FieldName,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Fetch query: field selection, filters and ordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub fields: Vec<FieldSelector>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl Query {
    /// Build a query selecting the given external field names.
    pub fn select<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|name| FieldSelector {
                    field: FieldName { name: name.to_string() },
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(mut self, field_name: &str, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field_name.to_string(),
            sort_type,
        });
        self
    }

    /// Names of the selected fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.name.as_str())
    }
}

/// Envelope for read calls. `data` is a list for fetches and a single
/// record (or null) for lookups by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> StoreResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// A field-level validation error attached to a failed record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel")]
    pub field_label: String,
    pub message: String,
}

/// Outcome for one record of a bulk call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecordResult {
    pub fn succeeded(data: Option<Record>) -> Self {
        Self {
            success: true,
            data,
            errors: Vec::new(),
            message: None,
        }
    }

    pub fn failed(errors: Vec<FieldError>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors,
            message,
        }
    }
}

/// Envelope for create/update/delete calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BulkResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

impl BulkResponse {
    pub fn ok(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            message: None,
            results: Some(results),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            results: None,
        }
    }
}

/// Record store trait that every store adapter implements.
///
/// A rejected request comes back as `Ok` with `success == false`; `Err` is
/// reserved for transport failures and undecodable responses.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the adapter type identifier (e.g., "http", "memory").
    fn store_type(&self) -> &str;

    async fn fetch_records(&self, table: &str, query: &Query) -> Result<StoreResponse<Vec<Record>>, StoreError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<StoreResponse<Record>, StoreError>;

    async fn create_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError>;

    /// Each record must carry its `Id`.
    async fn update_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError>;

    async fn delete_records(&self, table: &str, ids: Vec<i64>) -> Result<BulkResponse, StoreError>;
}
