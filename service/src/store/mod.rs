//! Document store used by the importers and the API.
//!
//! Documents are JSON bodies grouped into named collections and keyed by a
//! string identifier. The store supports point reads, whole-document writes,
//! shallow top-level merges, equality queries on (possibly nested) fields and
//! filtered deletes.
//!
//! - [`PgDocumentStore`] - `PostgreSQL` implementation backed by a JSONB table
//! - [`memory::InMemoryStore`] - in-process implementation for tests (behind `test-utils`)

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

pub use postgres::PgDocumentStore;

/// Collection names.
pub mod collections {
    pub const PERSONS: &str = "legislators";
    pub const COMMITTEES: &str = "committees";
    pub const MEMBERSHIPS: &str = "committee_memberships";
    pub const LEGISLATION_CACHE: &str = "legislation_cache";
    pub const VIDEO_CACHE: &str = "video_cache";
    pub const NEWS_CACHE: &str = "news_cache";
}

/// A document together with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: Value,
}

/// Equality condition on a dotted field path, e.g. `external_ids.govtrack`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    path: Vec<String>,
    value: Value,
}

impl FieldFilter {
    pub fn equals(path: &str, value: impl Into<Value>) -> Self {
        Self {
            path: path.split('.').map(str::to_string).collect(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Whether `body` holds `value` at this filter's path.
    #[must_use]
    pub fn matches(&self, body: &Value) -> bool {
        let mut current = body;
        for segment in &self.path {
            match current.get(segment) {
                Some(next) => current = next,
                None => return false,
            }
        }
        current == &self.value
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("failed to decode document {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError>;

    /// Create or fully replace a document.
    async fn put(&self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError>;

    /// Overwrite the given top-level fields of an existing document.
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete one document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// All documents matching every filter, ordered by id. No filters means the
    /// whole collection.
    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Delete every document matching all filters. Returns the number removed.
    async fn delete_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<u64, StoreError>;
}

/// Decode a stored document into a typed value.
///
/// # Errors
/// Returns `StoreError::Decode` when the body does not match `T`.
pub fn decode<T: DeserializeOwned>(doc: StoredDocument) -> Result<T, StoreError> {
    let StoredDocument { id, body } = doc;
    serde_json::from_value(body).map_err(|source| StoreError::Decode { id, source })
}

/// Encode a typed value as a document body.
///
/// # Errors
/// Returns `StoreError::Encode` if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(StoreError::Encode)
}

/// Fetch and decode a single document.
///
/// # Errors
/// Propagates store and decode failures.
pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    store.get(collection, id).await?.map(decode).transpose()
}

/// Encode and write a single document.
///
/// # Errors
/// Propagates store and encode failures.
pub async fn put_as<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), StoreError> {
    let body = encode(value)?;
    store.put(collection, id, &body).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_nested_path() {
        let body = json!({"state": "CA", "external_ids": {"govtrack": 412_345}});
        assert!(FieldFilter::equals("external_ids.govtrack", 412_345).matches(&body));
        assert!(FieldFilter::equals("state", "CA").matches(&body));
        assert!(!FieldFilter::equals("state", "ca").matches(&body));
        assert!(!FieldFilter::equals("external_ids.thomas", "01").matches(&body));
    }

    #[test]
    fn filter_type_sensitive() {
        let body = json!({"external_ids": {"govtrack": 300_001}});
        assert!(!FieldFilter::equals("external_ids.govtrack", "300001").matches(&body));
    }

    #[test]
    fn decode_reports_document_id() {
        let doc = StoredDocument {
            id: "A000001".into(),
            body: json!({"unexpected": true}),
        };
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            name: String,
        }
        let err = decode::<Needs>(doc).unwrap_err();
        assert!(err.to_string().contains("A000001"));
    }
}
