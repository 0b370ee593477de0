//! # In-Memory Store Backend
//!
//! Hash-map implementation of [`DocumentStore`]. Used by the test suite and
//! for running the API without a MongoDB instance. Counts are exact here,
//! which satisfies the approximate-count contract trivially.

use crate::error::{ShelfError, ShelfResult};
use crate::store::{ensure_document_id, Collection, DocumentStore, Filter, UpdateOutcome};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Whether a document matches an equality filter
fn matches(doc: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Id(id) => doc.get("_id").and_then(Value::as_str) == Some(id.as_str()),
        Filter::Eq(field, value) => doc.get(field) == Some(value),
        Filter::IdIn(ids) => doc
            .get("_id")
            .and_then(Value::as_str)
            .is_some_and(|id| ids.iter().any(|candidate| candidate == id)),
    }
}

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ShelfResult<std::sync::RwLockReadGuard<'_, HashMap<Collection, Vec<Value>>>> {
        self.collections
            .read()
            .map_err(|_| ShelfError::Internal("memory store lock poisoned".into()))
    }

    fn write(
        &self,
    ) -> ShelfResult<std::sync::RwLockWriteGuard<'_, HashMap<Collection, Vec<Value>>>> {
        self.collections
            .write()
            .map_err(|_| ShelfError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: Collection, mut doc: Value) -> ShelfResult<String> {
        let id = ensure_document_id(&mut doc)?;
        self.write()?.entry(collection).or_default().push(doc);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> ShelfResult<Option<Value>> {
        Ok(self
            .read()?
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)).cloned()))
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> ShelfResult<Vec<Value>> {
        Ok(self
            .read()?
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Value,
    ) -> ShelfResult<UpdateOutcome> {
        let fields = set
            .as_object()
            .ok_or_else(|| ShelfError::Internal("update set must be a JSON object".into()))?
            .clone();

        let mut collections = self.write()?;
        let docs = collections.entry(collection).or_default();

        let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &filter)) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let obj = doc
            .as_object_mut()
            .ok_or_else(|| ShelfError::Internal("stored document is not an object".into()))?;

        let mut modified = 0;
        for (key, value) in fields {
            if obj.get(&key) != Some(&value) {
                obj.insert(key, value);
                modified = 1;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> ShelfResult<u64> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection).or_default();
        match docs.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: Collection, filter: Filter) -> ShelfResult<u64> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection).or_default();
        let before = docs.len();
        docs.retain(|doc| !matches(doc, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn estimated_count(&self, collection: Collection) -> ShelfResult<u64> {
        Ok(self
            .read()?
            .get(&collection)
            .map(|docs| docs.len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Books, json!({ "title": "Dune" }))
            .await
            .unwrap();

        let found = store
            .find_one(Collection::Books, Filter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["title"], json!("Dune"));

        let missing = store
            .find_one(Collection::Books, Filter::by_id("nope"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_equality_filter_scopes_by_owner() {
        let store = MemoryStore::new();
        for (email, book) in [("a@x.com", "b1"), ("a@x.com", "b2"), ("b@x.com", "b3")] {
            store
                .insert_one(
                    Collection::Carts,
                    json!({ "email": email, "bookId": book }),
                )
                .await
                .unwrap();
        }

        let mine = store
            .find_many(Collection::Carts, Filter::field("email", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|doc| doc["email"] == json!("a@x.com")));
    }

    #[tokio::test]
    async fn test_update_one_sets_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Users, json!({ "email": "a@x.com" }))
            .await
            .unwrap();

        let outcome = store
            .update_one(
                Collection::Users,
                Filter::by_id(&id),
                json!({ "role": "admin" }),
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.modified, 1);

        let user = store
            .find_one(Collection::Users, Filter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user["role"], json!("admin"));

        let outcome = store
            .update_one(
                Collection::Users,
                Filter::by_id("missing"),
                json!({ "role": "admin" }),
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 0);
    }

    #[tokio::test]
    async fn test_delete_many_by_id_set() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for book in ["b1", "b2", "b3"] {
            ids.push(
                store
                    .insert_one(
                        Collection::Carts,
                        json!({ "email": "a@x.com", "bookId": book }),
                    )
                    .await
                    .unwrap(),
            );
        }

        let kept = ids.pop().unwrap();
        let deleted = store
            .delete_many(Collection::Carts, Filter::IdIn(ids))
            .await
            .unwrap();
        assert_eq!(deleted, 2);

        let remaining = store
            .find_many(Collection::Carts, Filter::All)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["_id"], json!(kept));
    }

    #[tokio::test]
    async fn test_counts_on_empty_collection() {
        let store = MemoryStore::new();
        assert_eq!(
            store.estimated_count(Collection::Payments).await.unwrap(),
            0
        );

        store
            .insert_one(Collection::Payments, json!({ "email": "a@x.com" }))
            .await
            .unwrap();
        assert_eq!(
            store.estimated_count(Collection::Payments).await.unwrap(),
            1
        );
    }
}
