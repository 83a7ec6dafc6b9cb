use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Entity, FarmScoped};
use crate::backend::Record;
use crate::constants::TABLE_TASKS;
use crate::schema::{FieldKind, FieldMapping, Schema};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub priority: String,
    pub completed: bool,
    pub recurring: bool,
    pub farm_id: String,
}

/// Task input. `completed` is ignored on create, where it is always false.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: String,
    pub priority: String,
    pub completed: bool,
    pub recurring: bool,
    pub farm_id: String,
}

pub static TASK_SCHEMA: Schema = Schema {
    table: TABLE_TASKS,
    fields: &[
        FieldMapping::new("title_c", "title", FieldKind::Text),
        FieldMapping::new("description_c", "description", FieldKind::Text),
        FieldMapping::new("dueDate_c", "dueDate", FieldKind::Text),
        FieldMapping::new("priority_c", "priority", FieldKind::Text),
        FieldMapping::new("completed_c", "completed", FieldKind::Boolean),
        FieldMapping::new("recurring_c", "recurring", FieldKind::Boolean),
        FieldMapping::new("farmId_c", "farmId", FieldKind::Relation),
    ],
    display_field: Some("title"),
};

impl Entity for Task {
    type Draft = TaskDraft;
    const KIND: &'static str = "task";

    fn schema() -> &'static Schema {
        &TASK_SCHEMA
    }

    fn prepare_create(record: &mut Record) {
        record.insert("completed_c".to_string(), Value::Bool(false));
    }
}

impl FarmScoped for Task {}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        Self {
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            completed: task.completed,
            recurring: task.recurring,
            farm_id: task.farm_id,
        }
    }
}
