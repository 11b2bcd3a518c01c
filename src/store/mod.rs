// src/store/mod.rs

//! Document collection API backing every admin screen.
//!
//! Collections hold schemaless JSON documents keyed by a string id. Writes are
//! single-document; there is no cross-document atomicity and deleting a
//! document never cascades to documents that reference it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// Collection names used by the platform.
pub mod collections {
    pub const MODULES: &str = "modules";
    pub const EXAMS: &str = "exams";
    pub const EXAM_RESULTS: &str = "exam_results";
    pub const EVENT_CATEGORIES: &str = "eventCategories";
    pub const EVENTS: &str = "events";
    pub const USERS: &str = "users";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store backend failure: {0}")]
    Backend(String),

    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("document '{id}' in '{collection}' is malformed: {reason}")]
    Decode {
        collection: String,
        id: String,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A stored document: its id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

/// Equality filter on one top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.data.get(&self.field) == Some(&self.value)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Stores a new document and returns its generated id.
    async fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError>;

    /// Merges `partial` into the top-level fields of an existing document.
    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError>;

    /// Removes a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;
}

/// Builds a `Fields` map from a `json!` object literal.
/// Non-object values produce an empty map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
