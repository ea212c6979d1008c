//! Request handlers for the `/api/todos` resource.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use todo_core::{CreateTodo, NewTodo, Todo, TodoId, TodoPatch, UpdateTodo};

use crate::error::ApiError;
use crate::{AppState, UpdateMode};

pub const UPDATED_MESSAGE: &str = "Todo updated successfully";

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId)
}

/// Parses a JSON request body regardless of `Content-Type`. An empty body
/// counts as `{}`.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(ApiError::InvalidBody)
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list().await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: CreateTodo = parse_body(&body)?;
    let body = input.body.unwrap_or_default();
    if body.is_empty() {
        return Err(ApiError::BodyRequired);
    }
    let todo = state.store.insert(NewTodo { body }).await?;
    tracing::debug!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// In `ForceComplete` mode the parsed body is validated and then dropped:
/// the record is always marked completed.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&id)?;
    let input: UpdateTodo = parse_body(&body)?;

    let patch = match state.update_mode {
        UpdateMode::ForceComplete => TodoPatch::complete(),
        UpdateMode::ApplyBody => {
            if input.body.as_deref() == Some("") {
                return Err(ApiError::BodyRequired);
            }
            TodoPatch::from(input)
        }
    };

    let matched = state.store.update(id, patch).await?;
    tracing::debug!(%id, matched, "todo updated");
    Ok(Json(Message {
        message: UPDATED_MESSAGE,
    }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.store.delete(id).await?;
    tracing::debug!(%id, deleted, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_rejects_non_hex() {
        assert!(matches!(parse_id("not-an-id"), Err(ApiError::InvalidId)));
        assert!(parse_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
    }

    #[test]
    fn empty_body_is_empty_object() {
        let input: UpdateTodo = parse_body(b"").unwrap();
        assert!(input.completed.is_none());
        let input: CreateTodo = parse_body(b"  \n").unwrap();
        assert!(input.body.is_none());
    }

    #[test]
    fn body_must_be_json() {
        let result: Result<UpdateTodo, _> = parse_body(b"completed");
        assert!(matches!(result, Err(ApiError::InvalidBody(_))));
        let result: Result<CreateTodo, _> = parse_body(br#"{"body":7}"#);
        assert!(matches!(result, Err(ApiError::InvalidBody(_))));
        let input: UpdateTodo = parse_body(br#"{"completed":false}"#).unwrap();
        assert_eq!(input.completed, Some(false));
    }
}
