//! The storage seam behind the HTTP handlers.
//!
//! # Design
//! Handlers hold an `Arc<dyn TodoStore>` and never see the driver. Update and
//! delete report how many records they touched but a zero count is not an
//! error: matching nothing is a successful no-op, same as MongoDB's
//! update/delete-by-filter.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::id::TodoId;
use crate::types::{NewTodo, Todo, TodoPatch};

/// Backend holding the todo collection.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Returns every record in storage order.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Inserts a not-yet-completed record and returns it with its new id.
    async fn insert(&self, todo: NewTodo) -> Result<Todo>;

    /// Applies `patch` to the record with `id`. Returns the matched count.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<u64>;

    /// Removes the record with `id`. Returns the deleted count.
    async fn delete(&self, id: TodoId) -> Result<u64>;
}

/// In-memory store for development and tests. Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    todos: RwLock<Vec<Todo>>,
    unavailable: Option<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `StoreError::Unavailable`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            todos: RwLock::default(),
            unavailable: Some(reason.into()),
        }
    }

    fn check(&self) -> Result<()> {
        match &self.unavailable {
            Some(reason) => Err(StoreError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.check()?;
        Ok(self.todos.read().await.clone())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        self.check()?;
        let todo = Todo {
            id: TodoId::new(),
            completed: false,
            body: todo.body,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<u64> {
        self.check()?;
        let mut todos = self.todos.write().await;
        match todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                patch.apply_to(todo);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        self.check()?;
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        Ok((before - todos.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(body: &str) -> NewTodo {
        NewTodo {
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_defaults_completed() {
        let store = InMemoryStore::new();
        let todo = store.insert(new_todo("Buy milk")).await.unwrap();
        assert!(!todo.completed);
        assert_eq!(todo.body, "Buy milk");
        assert_eq!(store.list().await.unwrap(), vec![todo]);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = InMemoryStore::new();
        let a = store.insert(new_todo("a")).await.unwrap();
        let b = store.insert(new_todo("b")).await.unwrap();
        let c = store.insert(new_todo("c")).await.unwrap();
        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let store = InMemoryStore::new();
        let kept = store.insert(new_todo("kept")).await.unwrap();
        let matched = store.update(TodoId::new(), TodoPatch::complete()).await.unwrap();
        assert_eq!(matched, 0);
        assert_eq!(store.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = InMemoryStore::new();
        let todo = store.insert(new_todo("x")).await.unwrap();
        let matched = store.update(todo.id, TodoPatch::complete()).await.unwrap();
        assert_eq!(matched, 1);
        assert!(store.list().await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryStore::new();
        let todo = store.insert(new_todo("x")).await.unwrap();
        assert_eq!(store.delete(todo.id).await.unwrap(), 1);
        assert_eq!(store.delete(todo.id).await.unwrap(), 0);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryStore::unavailable("down for maintenance");
        assert!(matches!(store.list().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.insert(new_todo("x")).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.update(TodoId::new(), TodoPatch::complete()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.delete(TodoId::new()).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
