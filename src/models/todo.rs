use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A todo item as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier for the todo (UUID v4), exposed on the wire as `_id`.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The text of the todo. Required by the storage layer; an empty string is
    /// accepted as-is.
    pub text: String,
    /// Whether the todo has been completed.
    pub completed: bool,
    /// Set exactly while `completed` is true, stamped at the transition.
    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Identifier of the user who created the todo. Fixed at creation.
    #[serde(rename = "owner")]
    pub owner_id: i32,
}

/// Input structure for creating a todo.
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoInput {
    /// The text of the todo. A missing field fails body deserialization.
    pub text: String,
}

/// Partial update body for `PATCH /todos/{id}`.
///
/// Only `text` and `completed` are read; any other field in the request body is
/// ignored. `completed` is kept as raw JSON because any value other than the
/// boolean `true` (absent, `false`, a string, a number) demotes the todo to
/// not-completed instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<serde_json::Value>,
}

impl TodoPatch {
    /// True only for the literal JSON boolean `true`.
    pub fn marks_completed(&self) -> bool {
        matches!(self.completed, Some(serde_json::Value::Bool(true)))
    }
}

impl Todo {
    /// Creates a new `Todo` from `TodoInput` and the creator's user id.
    /// New todos always start not-completed with no completion timestamp.
    pub fn new(input: TodoInput, owner_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: input.text,
            completed: false,
            completed_at: None,
            owner_id,
        }
    }
}
