//! Domain types and storage for the todo service.
//!
//! # Overview
//! A todo is a text `body` with a `completed` flag and a store-assigned id.
//! Records live in a MongoDB collection behind the `TodoStore` trait; an
//! in-memory implementation of the same trait backs tests and local runs.
//!
//! # Design
//! - `TodoId` wraps a BSON `ObjectId` and is the only way to address a record;
//!   parsing it is where malformed client input gets rejected.
//! - Zero-match update/delete are `Ok(0)`, never errors.
//! - The store is injected (`Arc<dyn TodoStore>`) rather than held globally.

pub mod error;
pub mod id;
pub mod mongo;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use id::{InvalidId, TodoId};
pub use mongo::MongoStore;
pub use store::{InMemoryStore, TodoStore};
pub use types::{CreateTodo, NewTodo, Todo, TodoPatch, UpdateTodo};
