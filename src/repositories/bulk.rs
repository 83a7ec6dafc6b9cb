//! Partitioning of per-record bulk results.

use crate::backend::RecordResult;
use crate::notify::Notifier;

/// Per-record results of a bulk call, split by outcome.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<RecordResult>,
    pub failed: Vec<RecordResult>,
}

impl BulkOutcome {
    pub fn partition(results: Vec<RecordResult>) -> Self {
        let (succeeded, failed) = results.into_iter().partition(|r| r.success);
        Self { succeeded, failed }
    }

    /// Messages for every failed record: each field error as
    /// `"<label>: <message>"`, then the record-level message.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .flat_map(|record| {
                record
                    .errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field_label, e.message))
                    .chain(record.message.clone())
            })
            .collect()
    }

    pub fn report(&self, notifier: &dyn Notifier) {
        for message in self.failure_messages() {
            notifier.error(&message);
        }
    }

    pub fn any_succeeded(&self) -> bool {
        !self.succeeded.is_empty()
    }
}
