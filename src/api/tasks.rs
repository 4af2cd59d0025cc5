use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::error::ApiError;

pub const TITLE_MAX_LEN: usize = 200;

/// Wire representation of a task. `owner` is the owner's username, derived
/// at serialization time; it is never accepted on input.
#[derive(Debug, Serialize)]
pub struct TaskOut {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: String,
}

impl TaskOut {
    pub fn from_task(task: Task, owner: &str) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
            owner: owner.to_string(),
        }
    }
}

/// Parse a create/replace payload.
///
/// Only `title`, `description`, and `completed` are writable. `id`,
/// timestamps, and `owner` are ignored if supplied: a create request
/// carrying an `owner` field still succeeds, with the server forcing the
/// owner to the requester.
pub fn draft_from_json(payload: Value) -> Result<TaskDraft, ApiError> {
    let map = object_payload(payload)?;
    let mut field_errors = HashMap::new();

    let title = match map.get("title") {
        None | Some(Value::Null) => {
            field_errors.insert("title".to_string(), "This field is required".to_string());
            None
        }
        Some(value) => parse_title(value, &mut field_errors),
    };

    let description = match map.get("description") {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            field_errors.insert("description".to_string(), "Expected a string".to_string());
            None
        }
    };

    let completed = match map.get("completed") {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            field_errors.insert("completed".to_string(), "Expected a boolean".to_string());
            None
        }
    };

    match (title, description, completed) {
        (Some(title), Some(description), Some(completed)) if field_errors.is_empty() => {
            Ok(TaskDraft {
                title,
                description,
                completed,
            })
        }
        _ => Err(ApiError::validation_error(
            "Invalid task payload",
            Some(field_errors),
        )),
    }
}

/// Parse a partial-update payload. Absent (or null) fields stay unchanged;
/// read-only fields are ignored the same way as on create.
pub fn patch_from_json(payload: Value) -> Result<TaskPatch, ApiError> {
    let map = object_payload(payload)?;
    let mut field_errors = HashMap::new();
    let mut patch = TaskPatch::default();

    match map.get("title") {
        None | Some(Value::Null) => {}
        Some(value) => patch.title = parse_title(value, &mut field_errors),
    }

    match map.get("description") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => patch.description = Some(s.clone()),
        Some(_) => {
            field_errors.insert("description".to_string(), "Expected a string".to_string());
        }
    }

    match map.get("completed") {
        None | Some(Value::Null) => {}
        Some(Value::Bool(b)) => patch.completed = Some(*b),
        Some(_) => {
            field_errors.insert("completed".to_string(), "Expected a boolean".to_string());
        }
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Invalid task payload",
            Some(field_errors),
        ));
    }
    Ok(patch)
}

fn object_payload(payload: Value) -> Result<Map<String, Value>, ApiError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::invalid_json("Expected JSON object")),
    }
}

fn parse_title(value: &Value, field_errors: &mut HashMap<String, String>) -> Option<String> {
    match value {
        Value::String(s) => {
            if s.trim().is_empty() {
                field_errors.insert("title".to_string(), "This field may not be blank".to_string());
                None
            } else if s.chars().count() > TITLE_MAX_LEN {
                field_errors.insert(
                    "title".to_string(),
                    format!("Ensure this field has no more than {} characters", TITLE_MAX_LEN),
                );
                None
            } else {
                Some(s.clone())
            }
        }
        _ => {
            field_errors.insert("title".to_string(), "Expected a string".to_string());
            None
        }
    }
}
