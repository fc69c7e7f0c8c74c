//! In-process document store for tests.
//!
//! Records how often `get` and `query` reach it so cache tests can assert on
//! store traffic.

#![allow(clippy::missing_panics_doc, clippy::must_use_candidate)]

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, PoisonError,
    },
};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{DocumentStore, FieldFilter, StoreError, StoredDocument};

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<Collections>,
    get_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
        let mut guard = self
            .collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Number of `get` calls so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `query` calls so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Documents currently in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.with_collections(|c| c.get(collection).map_or(0, BTreeMap::len))
    }

    /// Raw body of a document without touching the call counters.
    pub fn peek(&self, collection: &str, id: &str) -> Option<Value> {
        self.with_collections(|c| c.get(collection).and_then(|docs| docs.get(id)).cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(collection, id).map(|body| StoredDocument {
            id: id.to_string(),
            body,
        }))
    }

    async fn put(&self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError> {
        self.with_collections(|c| {
            c.entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), body.clone());
        });
        Ok(())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.with_collections(|c| {
            let Some(Value::Object(body)) = c.get_mut(collection).and_then(|docs| docs.get_mut(id))
            else {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            };
            for (key, value) in fields {
                body.insert(key.clone(), value.clone());
            }
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self.with_collections(|c| {
            c.get_mut(collection)
                .is_some_and(|docs| docs.remove(id).is_some())
        }))
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.with_collections(|c| {
            c.get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|(_, body)| filters.iter().all(|f| f.matches(body)))
                        .map(|(id, body)| StoredDocument {
                            id: id.clone(),
                            body: body.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    async fn delete_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<u64, StoreError> {
        Ok(self.with_collections(|c| {
            let Some(docs) = c.get_mut(collection) else {
                return 0;
            };
            let before = docs.len();
            docs.retain(|_, body| !filters.iter().all(|f| f.matches(body)));
            (before - docs.len()) as u64
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn merge_overwrites_top_level_fields_only() {
        let store = InMemoryStore::new();
        store
            .put("people", "A", &json!({"name": "A", "counts": {"x": 1}}))
            .await
            .unwrap();

        let mut fields = Map::new();
        fields.insert("counts".into(), json!({"y": 2}));
        store.merge("people", "A", &fields).await.unwrap();

        assert_eq!(
            store.peek("people", "A"),
            Some(json!({"name": "A", "counts": {"y": 2}}))
        );
    }

    #[tokio::test]
    async fn merge_into_missing_document_fails() {
        let store = InMemoryStore::new();
        let err = store.merge("people", "missing", &Map::new()).await;
        assert!(matches!(err, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn delete_where_only_removes_matches() {
        let store = InMemoryStore::new();
        store.put("people", "A", &json!({"chamber": "House"})).await.unwrap();
        store.put("people", "B", &json!({"chamber": "Governor"})).await.unwrap();

        let removed = store
            .delete_where("people", &[FieldFilter::equals("chamber", "Governor")])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.count("people"), 1);
        assert!(store.peek("people", "A").is_some());
    }

    #[tokio::test]
    async fn query_counts_calls_and_orders_by_id() {
        let store = InMemoryStore::new();
        store.put("people", "B", &json!({})).await.unwrap();
        store.put("people", "A", &json!({})).await.unwrap();

        let docs = store.query("people", &[]).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(store.query_calls(), 1);
    }
}
