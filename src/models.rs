use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level weekly task. Ids are unique within one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub is_planned: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub sub_tasks: Vec<SubTaskItem>,
}

/// A sub-task nested under one task. Ids are unique within the parent task;
/// sub-tasks carry no planned flag and do not nest further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTaskItem {
    pub id: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A feedback entry stored at the workspace root. Ids are unique across the
/// whole feedback scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    pub id: u32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Tri-state inclusion filter applied to every converted entity, at every
/// nesting depth. `None` leaves a dimension unconstrained; `Some(value)`
/// requires the entity's flag to equal `value`. Dimensions an entity kind
/// does not expose (planned for sub-tasks and feedback, done for feedback)
/// never constrain it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub done: Option<bool>,
    pub planned: Option<bool>,
    pub deleted: Option<bool>,
}

impl TaskFilter {
    /// Default listing filter: surface everything, done or not, planned or
    /// not, but exclude deleted entries.
    pub fn include_default() -> Self {
        Self {
            done: None,
            planned: None,
            deleted: Some(false),
        }
    }

    /// No constraints at all. Lookups by id use this so a deleted entity is
    /// still visible and reports its deletion.
    pub fn unconstrained() -> Self {
        Self::default()
    }
}
