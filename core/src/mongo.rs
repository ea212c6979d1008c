//! MongoDB-backed `TodoStore`.
//!
//! # Design
//! Documents are stored as `{_id, completed, body}`. `TodoDocument` is the
//! on-disk shape and omits `_id` on insert so the database assigns it; the
//! id is then read back from the insert result. Missing `completed` / `body`
//! fields decode as `false` / `""`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::id::TodoId;
use crate::store::TodoStore;
use crate::types::{NewTodo, Todo, TodoPatch};

pub const DEFAULT_DATABASE: &str = "todos";
pub const DEFAULT_COLLECTION: &str = "todos";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    body: String,
}

impl TryFrom<TodoDocument> for Todo {
    type Error = StoreError;

    fn try_from(doc: TodoDocument) -> Result<Self> {
        Ok(Todo {
            id: doc.id.ok_or(StoreError::MissingId)?.into(),
            completed: doc.completed,
            body: doc.body,
        })
    }
}

fn set_document(patch: &TodoPatch) -> Document {
    let mut set = Document::new();
    if let Some(completed) = patch.completed {
        set.insert("completed", completed);
    }
    if let Some(body) = &patch.body {
        set.insert("body", body.as_str());
    }
    set
}

/// Handle to the todo collection of a connected MongoDB deployment.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<TodoDocument>,
}

impl MongoStore {
    /// Connects with `uri` and pings `database` before handing out the
    /// collection. Fails if either step fails; there is no retry.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        tracing::debug!(database, collection, "MongoDB ping succeeded");
        Ok(Self {
            collection: db.collection(collection),
            client,
        })
    }

    /// The underlying driver client, for shutting it down on exit.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn list(&self) -> Result<Vec<Todo>> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<TodoDocument> = cursor.try_collect().await?;
        docs.into_iter().map(Todo::try_from).collect()
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let doc = TodoDocument {
            id: None,
            completed: false,
            body: todo.body,
        };
        let result = self.collection.insert_one(&doc).await?;
        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedId(result.inserted_id.to_string()))?;
        Ok(Todo {
            id: oid.into(),
            completed: doc.completed,
            body: doc.body,
        })
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": set_document(&patch) },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson;

    use super::*;

    #[test]
    fn insert_document_omits_id() {
        let doc = TodoDocument {
            id: None,
            completed: false,
            body: "Buy milk".to_string(),
        };
        let encoded = bson::to_document(&doc).unwrap();
        assert!(!encoded.contains_key("_id"));
        assert!(!encoded.get_bool("completed").unwrap());
        assert_eq!(encoded.get_str("body").unwrap(), "Buy milk");
    }

    #[test]
    fn sparse_document_decodes_with_zero_values() {
        let oid = ObjectId::new();
        let decoded: TodoDocument = bson::from_document(doc! { "_id": oid }).unwrap();
        let todo = Todo::try_from(decoded).unwrap();
        assert_eq!(todo.id, TodoId::from(oid));
        assert!(!todo.completed);
        assert!(todo.body.is_empty());
    }

    #[test]
    fn document_without_id_is_rejected() {
        let decoded: TodoDocument = bson::from_document(doc! { "body": "x" }).unwrap();
        assert!(matches!(Todo::try_from(decoded), Err(StoreError::MissingId)));
    }

    #[test]
    fn set_document_only_contains_patched_fields() {
        let set = set_document(&TodoPatch::complete());
        assert_eq!(set, doc! { "completed": true });

        let set = set_document(&TodoPatch {
            completed: Some(false),
            body: Some("renamed".to_string()),
        });
        assert_eq!(set, doc! { "completed": false, "body": "renamed" });
    }
}
