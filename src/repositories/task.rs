//! Task-specific repository operations.

use chrono::{DateTime, Utc};
use log::error;

use super::{Report, Repository, RepositoryError};
use crate::backend::{Condition, Operator, SortType};
use crate::constants::{DEFAULT_UPCOMING_WINDOW_DAYS, ERROR_TASK_NOT_FOUND};
use crate::entities::{Task, TaskDraft};
use crate::schema::IntoRecordId;
use crate::utils::datetime;

impl Repository<Task> {
    /// Incomplete tasks due within `[now, now + days]`, earliest first.
    pub async fn try_get_upcoming_within(&self, now: DateTime<Utc>, days: i64) -> Result<Vec<Task>, RepositoryError> {
        let (start, end) = datetime::window_from(now, days);
        let query = self
            .query()
            .filter(Condition::new("completed_c", Operator::EqualTo, false))
            .filter(Condition::new("dueDate_c", Operator::LessThanOrEqualTo, end))
            .filter(Condition::new("dueDate_c", Operator::GreaterThanOrEqualTo, start))
            .order("dueDate_c", SortType::Asc);
        self.fetch(&query, Report::LogOnly).await
    }

    pub async fn get_upcoming_within(&self, now: DateTime<Utc>, days: i64) -> Vec<Task> {
        self.try_get_upcoming_within(now, days).await.unwrap_or_else(|e| {
            error!("Error fetching upcoming tasks: {}", e);
            Vec::new()
        })
    }

    /// Upcoming tasks for the week following `now`.
    pub async fn get_upcoming_at(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.get_upcoming_within(now, DEFAULT_UPCOMING_WINDOW_DAYS).await
    }

    /// Upcoming tasks for the coming week.
    pub async fn get_upcoming(&self) -> Vec<Task> {
        self.get_upcoming_at(Utc::now()).await
    }

    /// Flip a task's `completed` flag.
    ///
    /// Reads the task, then writes it back with the flag inverted. The two
    /// calls are not isolated: an update landing between them is overwritten.
    pub async fn try_toggle_complete(&self, id: impl IntoRecordId) -> Result<Task, RepositoryError> {
        self.client()?;
        let id = id.into_record_id()?;
        let current = self
            .try_get_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound { kind: "task", id })?;

        let mut draft = TaskDraft::from(current);
        draft.completed = !draft.completed;
        self.try_update(id, &draft).await
    }

    pub async fn toggle_complete(&self, id: impl IntoRecordId) -> Option<Task> {
        match self.try_toggle_complete(id).await {
            Ok(task) => Some(task),
            Err(RepositoryError::NotFound { id, .. }) => {
                error!("Error toggling task completion: {} ({})", ERROR_TASK_NOT_FOUND, id);
                None
            }
            Err(e) => {
                error!("Error toggling task completion: {}", e);
                None
            }
        }
    }
}
