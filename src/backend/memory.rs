//! In-memory record store.
//!
//! Evaluates the store's query language locally and keeps rows per table in
//! insertion order. Useful for tests, demos and offline development; it also
//! supports scripted failures so callers can exercise rejected requests,
//! transport errors and partial bulk failures.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::utils::datetime;

use super::{
    BulkResponse, Condition, FieldError, Operator, Query, Record, RecordResult, RecordStore, SortType, StoreError,
    StoreResponse,
};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<Record>,
}

/// Canned outcome returned by the next call instead of touching the tables.
#[derive(Clone, Debug)]
enum Scripted {
    Reject(String),
    Transport(String),
    Bulk(BulkResponse),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Read,
    Write,
}

/// Field that must be present and non-empty on create/update.
#[derive(Clone, Debug)]
struct Requirement {
    field: String,
    label: String,
}

/// Record store backed by process memory.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, Table>>,
    script: Mutex<VecDeque<Scripted>>,
    requirements: Mutex<HashMap<String, Vec<Requirement>>>,
    embedded_relations: HashSet<String>,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return integer values of `field` as `{"Id": n}` objects on read, the
    /// way the hosted store expands lookup columns.
    pub fn with_embedded_relation(mut self, field: &str) -> Self {
        self.embedded_relations.insert(field.to_string());
        self
    }

    /// Number of calls received so far, scripted ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Insert a row as-is, assigning an `Id` when missing. Returns the id.
    pub async fn seed(&self, table: &str, mut record: Record) -> i64 {
        let mut tables = self.tables.lock().await;
        let table = tables.entry(table.to_string()).or_default();
        let id = match record.get("Id").and_then(Value::as_i64) {
            Some(id) => {
                table.next_id = table.next_id.max(id);
                id
            }
            None => {
                table.next_id += 1;
                table.next_id
            }
        };
        record.insert("Id".to_string(), json!(id));
        table.rows.push(record);
        id
    }

    /// Raw stored row, ignoring field selection.
    pub async fn raw(&self, table: &str, id: i64) -> Option<Record> {
        let tables = self.tables.lock().await;
        tables
            .get(table)
            .and_then(|t| t.rows.iter().find(|row| row_id(row) == Some(id)).cloned())
    }

    /// The next call is rejected with `success == false`.
    pub async fn reject_next(&self, message: &str) {
        self.script.lock().await.push_back(Scripted::Reject(message.to_string()));
    }

    /// The next call fails at the transport level.
    pub async fn fail_next_transport(&self, message: &str) {
        self.script.lock().await.push_back(Scripted::Transport(message.to_string()));
    }

    /// The next bulk call returns `response` verbatim.
    pub async fn respond_next_bulk(&self, response: BulkResponse) {
        self.script.lock().await.push_back(Scripted::Bulk(response));
    }

    /// Creates and updates on `table` fail per record when `field` is
    /// missing, null or an empty string.
    pub async fn require_field(&self, table: &str, field: &str, label: &str) {
        self.requirements
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .push(Requirement {
                field: field.to_string(),
                label: label.to_string(),
            });
    }

    /// Pop the next scripted outcome if it applies to this kind of call. A
    /// queued bulk response stays queued across reads.
    async fn next_scripted(&self, call: Call) -> Option<Scripted> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut script = self.script.lock().await;
        let bulk_queued = matches!(script.front(), Some(Scripted::Bulk(_)));
        if bulk_queued && call == Call::Read {
            return None;
        }
        script.pop_front()
    }

    async fn violations(&self, table: &str, record: &Record) -> Vec<FieldError> {
        let requirements = self.requirements.lock().await;
        requirements
            .get(table)
            .map(|reqs| {
                reqs.iter()
                    .filter(|req| match record.get(&req.field) {
                        None | Some(Value::Null) => true,
                        Some(Value::String(s)) => s.trim().is_empty(),
                        Some(_) => false,
                    })
                    .map(|req| FieldError {
                        field_label: req.label.clone(),
                        message: "is required".to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn present(&self, row: &Record, query: &Query) -> Record {
        let mut out = Record::new();
        let mut names: Vec<&str> = query.field_names().collect();
        if names.is_empty() {
            names = row.keys().map(String::as_str).collect();
        }
        for name in names {
            if let Some(value) = row.get(name) {
                let value = match value {
                    Value::Number(n) if self.embedded_relations.contains(name) => json!({ "Id": n }),
                    other => other.clone(),
                };
                out.insert(name.to_string(), value);
            }
        }
        if let Some(id) = row.get("Id") {
            out.insert("Id".to_string(), id.clone());
        }
        out
    }

    fn present_full(&self, row: &Record) -> Record {
        self.present(row, &Query::default())
    }
}

fn row_id(row: &Record) -> Option<i64> {
    row.get("Id").and_then(Value::as_i64)
}

/// Unwrap `{"Id": n}` relation objects to their identifier.
fn comparable(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get("Id").unwrap_or(value),
        other => other,
    }
}

/// RFC 3339 timestamps in any offset, or plain dates taken as UTC midnight.
fn as_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    datetime::parse_date(text)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (comparable(left), comparable(right)) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => match (as_instant(a), as_instant(b)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(a.cmp(b)),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::Number(b)) | (Value::Number(b), Value::String(a)) => {
            let a: f64 = a.parse().ok()?;
            let ordering = a.partial_cmp(&b.as_f64()?)?;
            if matches!(comparable(left), Value::String(_)) {
                Some(ordering)
            } else {
                Some(ordering.reverse())
            }
        }
        _ => None,
    }
}

/// Evaluate one condition against a row. A row matches when any of the
/// condition's values satisfies the operator.
pub(crate) fn condition_matches(row: &Record, condition: &Condition) -> bool {
    let Some(actual) = row.get(&condition.field_name) else {
        return false;
    };
    condition.values.iter().any(|expected| {
        let ordering = compare_values(actual, expected);
        match condition.operator {
            Operator::EqualTo => ordering == Some(Ordering::Equal),
            Operator::LessThanOrEqualTo => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Operator::GreaterThanOrEqualTo => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        }
    })
}

/// Order rows by the query's keys; rows missing a key sort last.
pub(crate) fn sort_rows(rows: &mut [Record], query: &Query) {
    if query.order_by.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in &query.order_by {
            let ordering = match (a.get(&key.field_name), b.get(&key.field_name)) {
                (Some(x), Some(y)) => {
                    let ordering = compare_values(x, y).unwrap_or(Ordering::Equal);
                    match key.sort_type {
                        SortType::Asc => ordering,
                        SortType::Desc => ordering.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    async fn fetch_records(&self, table: &str, query: &Query) -> Result<StoreResponse<Vec<Record>>, StoreError> {
        match self.next_scripted(Call::Read).await {
            Some(Scripted::Reject(message)) => return Ok(StoreResponse::rejected(message)),
            Some(Scripted::Transport(message)) => return Err(StoreError::Network(message)),
            Some(Scripted::Bulk(_)) | None => {}
        }

        let tables = self.tables.lock().await;
        let mut rows: Vec<Record> = tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|row| query.conditions.iter().all(|c| condition_matches(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_rows(&mut rows, query);

        Ok(StoreResponse::ok(rows.iter().map(|row| self.present(row, query)).collect()))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        query: &Query,
    ) -> Result<StoreResponse<Record>, StoreError> {
        match self.next_scripted(Call::Read).await {
            Some(Scripted::Reject(message)) => return Ok(StoreResponse::rejected(message)),
            Some(Scripted::Transport(message)) => return Err(StoreError::Network(message)),
            Some(Scripted::Bulk(_)) | None => {}
        }

        let tables = self.tables.lock().await;
        let row = tables
            .get(table)
            .and_then(|t| t.rows.iter().find(|row| row_id(row) == Some(id)));

        Ok(match row {
            Some(row) => StoreResponse::ok(self.present(row, query)),
            None => StoreResponse::empty(),
        })
    }

    async fn create_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError> {
        match self.next_scripted(Call::Write).await {
            Some(Scripted::Reject(message)) => return Ok(BulkResponse::rejected(message)),
            Some(Scripted::Transport(message)) => return Err(StoreError::Network(message)),
            Some(Scripted::Bulk(response)) => return Ok(response),
            None => {}
        }

        let mut results = Vec::with_capacity(records.len());
        for mut record in records {
            let errors = self.violations(table, &record).await;
            if !errors.is_empty() {
                results.push(RecordResult::failed(errors, None));
                continue;
            }

            let mut tables = self.tables.lock().await;
            let table = tables.entry(table.to_string()).or_default();
            table.next_id += 1;
            record.insert("Id".to_string(), json!(table.next_id));
            table.rows.push(record.clone());
            results.push(RecordResult::succeeded(Some(self.present_full(&record))));
        }

        Ok(BulkResponse::ok(results))
    }

    async fn update_records(&self, table: &str, records: Vec<Record>) -> Result<BulkResponse, StoreError> {
        match self.next_scripted(Call::Write).await {
            Some(Scripted::Reject(message)) => return Ok(BulkResponse::rejected(message)),
            Some(Scripted::Transport(message)) => return Err(StoreError::Network(message)),
            Some(Scripted::Bulk(response)) => return Ok(response),
            None => {}
        }

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let Some(id) = row_id(&record) else {
                results.push(RecordResult::failed(Vec::new(), Some("Record Id is required".to_string())));
                continue;
            };

            let errors = self.violations(table, &record).await;
            if !errors.is_empty() {
                results.push(RecordResult::failed(errors, None));
                continue;
            }

            let mut tables = self.tables.lock().await;
            let row = tables
                .get_mut(table)
                .and_then(|t| t.rows.iter_mut().find(|row| row_id(row) == Some(id)));
            match row {
                Some(row) => {
                    for (key, value) in record {
                        row.insert(key, value);
                    }
                    results.push(RecordResult::succeeded(Some(self.present_full(row))));
                }
                None => results.push(RecordResult::failed(
                    Vec::new(),
                    Some(format!("Record {} not found", id)),
                )),
            }
        }

        Ok(BulkResponse::ok(results))
    }

    async fn delete_records(&self, table: &str, ids: Vec<i64>) -> Result<BulkResponse, StoreError> {
        match self.next_scripted(Call::Write).await {
            Some(Scripted::Reject(message)) => return Ok(BulkResponse::rejected(message)),
            Some(Scripted::Transport(message)) => return Err(StoreError::Network(message)),
            Some(Scripted::Bulk(response)) => return Ok(response),
            None => {}
        }

        let mut tables = self.tables.lock().await;
        let rows = tables.get_mut(table).map(|t| &mut t.rows);
        let mut results = Vec::with_capacity(ids.len());
        match rows {
            Some(rows) => {
                for id in ids {
                    match rows.iter().position(|row| row_id(row) == Some(id)) {
                        Some(index) => {
                            rows.remove(index);
                            results.push(RecordResult::succeeded(None));
                        }
                        None => results.push(RecordResult::failed(
                            Vec::new(),
                            Some(format!("Record {} not found", id)),
                        )),
                    }
                }
            }
            None => {
                for id in ids {
                    results.push(RecordResult::failed(
                        Vec::new(),
                        Some(format!("Record {} not found", id)),
                    ));
                }
            }
        }

        Ok(BulkResponse::ok(results))
    }
}
