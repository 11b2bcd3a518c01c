// src/models/mod.rs

pub mod category;
pub mod event;
pub mod exam;
pub mod exam_result;
pub mod module;
pub mod timestamp;
pub mod user;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{Document, DocumentStore, Filter, StoreError};

/// A record type persisted as one document in a fixed collection.
///
/// `from_document` is the data-access boundary: stored field names and
/// time formats are resolved here and nowhere else.
pub trait Entity: Sized {
    const COLLECTION: &'static str;

    /// `read_at` stands in for required timestamps that are missing.
    fn from_document(doc: &Document, read_at: DateTime<Utc>) -> Result<Self, StoreError>;

    fn id(&self) -> &str;
}

/// Deserializes the non-time fields of a document.
pub(crate) fn decode<T: DeserializeOwned>(
    collection: &str,
    doc: &Document,
) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc.data.clone())).map_err(|e| StoreError::Decode {
        collection: collection.to_string(),
        id: doc.id.clone(),
        reason: e.to_string(),
    })
}

/// Fetches a whole collection, or the part matching `filter`.
pub async fn load_all<T: Entity>(
    store: &dyn DocumentStore,
    filter: Option<&Filter>,
) -> Result<Vec<T>, StoreError> {
    let docs = match filter {
        Some(filter) => store.query(T::COLLECTION, filter).await?,
        None => store.list(T::COLLECTION).await?,
    };
    let read_at = Utc::now();
    docs.iter().map(|d| T::from_document(d, read_at)).collect()
}

pub async fn load_one<T: Entity>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store
        .get(T::COLLECTION, id)
        .await?
        .map(|d| T::from_document(&d, Utc::now()))
        .transpose()
}

/// Rejects required text that is empty or whitespace only.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("must_not_be_blank"));
    }
    Ok(())
}
