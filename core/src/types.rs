//! Domain DTOs for the todo API.
//!
//! # Design
//! `Todo` is the shape returned to clients. The request payloads are kept
//! separate so that a client can never smuggle an `id` or `completed` value
//! into a create call: unknown keys are ignored by serde and the fields simply
//! do not exist on `CreateTodo`.

use serde::{Deserialize, Serialize};

use crate::id::TodoId;

/// A single stored todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub completed: bool,
    pub body: String,
}

/// Request payload for `POST /api/todos`. A missing or `null` `body` is
/// reported with the same message as an explicit `""`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub body: Option<String>,
}

/// Request payload for `PATCH /api/todos/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub completed: Option<bool>,
    pub body: Option<String>,
}

/// A record about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub body: String,
}

/// Fields to `$set` on an existing record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub completed: Option<bool>,
    pub body: Option<String>,
}

impl TodoPatch {
    /// The patch the update endpoint applies by default: mark done, nothing else.
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            body: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.body.is_none()
    }

    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(body) = &self.body {
            todo.body = body.clone();
        }
    }
}

impl From<UpdateTodo> for TodoPatch {
    fn from(input: UpdateTodo) -> Self {
        Self {
            completed: input.completed,
            body: input.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: "65a1f0c2e4b0a1b2c3d4e5f6".parse().unwrap(),
            completed: false,
            body: "Buy milk".to_string(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(json["completed"], false);
        assert_eq!(json["body"], "Buy milk");
    }

    #[test]
    fn create_todo_ignores_client_id_and_completed() {
        let input: CreateTodo = serde_json::from_str(
            r#"{"id":"65a1f0c2e4b0a1b2c3d4e5f6","completed":true,"body":"Walk dog"}"#,
        )
        .unwrap();
        assert_eq!(input.body.as_deref(), Some("Walk dog"));
    }

    #[test]
    fn create_todo_missing_or_null_body_is_none() {
        let input: CreateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.body.is_none());
        let input: CreateTodo = serde_json::from_str(r#"{"body":null}"#).unwrap();
        assert!(input.body.is_none());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.completed.is_none());
        assert!(input.body.is_none());
        assert!(TodoPatch::from(input).is_empty());
    }

    #[test]
    fn complete_patch_touches_only_completed() {
        let mut todo = Todo {
            id: TodoId::new(),
            completed: false,
            body: "unchanged".to_string(),
        };
        TodoPatch::complete().apply_to(&mut todo);
        assert!(todo.completed);
        assert_eq!(todo.body, "unchanged");
    }
}
