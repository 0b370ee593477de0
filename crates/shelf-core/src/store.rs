//! # Document Store Seam
//!
//! Every collection is reached through the same handful of primitives:
//! equality-filtered find, insert, set-style update, delete, and an
//! approximate count. `DocumentStore` is the backend trait (in-memory and
//! MongoDB implementations exist); `TypedCollection` layers serde on top so
//! handlers work with typed entities instead of raw JSON.

use crate::error::{ShelfError, ShelfResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// The six collections this service touches, with their on-store names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Books,
    Carts,
    OldBooks,
    Reviews,
    Payments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Books => "books",
            Collection::Carts => "carts",
            Collection::OldBooks => "oldBook",
            Collection::Reviews => "review",
            Collection::Payments => "payments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filters — the only query shapes this system ever issues.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Match every document
    All,
    /// Match by `_id`
    Id(String),
    /// Match documents whose field equals the given value
    Eq(String, Value),
    /// Match documents whose `_id` is in the given set
    IdIn(Vec<String>),
}

impl Filter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Filter::Id(id.into())
    }

    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(name.into(), value.into())
    }
}

/// Outcome of an update, mirroring the store driver's counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Backend-agnostic document store primitives.
///
/// Documents are JSON objects. `insert_one` assigns a string `_id` when the
/// document lacks one and returns it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: Collection, doc: Value) -> ShelfResult<String>;

    async fn find_one(&self, collection: Collection, filter: Filter)
        -> ShelfResult<Option<Value>>;

    async fn find_many(&self, collection: Collection, filter: Filter) -> ShelfResult<Vec<Value>>;

    /// Set the given fields on the first matching document
    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Value,
    ) -> ShelfResult<UpdateOutcome>;

    async fn delete_one(&self, collection: Collection, filter: Filter) -> ShelfResult<u64>;

    async fn delete_many(&self, collection: Collection, filter: Filter) -> ShelfResult<u64>;

    /// Approximate collection size. May lag exact counts; never negative.
    async fn estimated_count(&self, collection: Collection) -> ShelfResult<u64>;
}

/// Ensure a document carries a string `_id`, assigning a UUID if absent.
/// Returns the id. Shared by store backends.
pub fn ensure_document_id(doc: &mut Value) -> ShelfResult<String> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| ShelfError::Internal("document must be a JSON object".into()))?;

    match obj.get("_id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(other) => Err(ShelfError::Validation(format!(
            "_id must be a non-empty string, got {other}"
        ))),
        None => {
            let id = Uuid::new_v4().to_string();
            obj.insert("_id".into(), Value::String(id.clone()));
            Ok(id)
        }
    }
}

/// A typed view over one collection of a shared store.
pub struct TypedCollection<T> {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection,
            _marker: PhantomData,
        }
    }
}

impl<T> TypedCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self {
            store,
            collection,
            _marker: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    fn encode(&self, value: &T) -> ShelfResult<Value> {
        serde_json::to_value(value).map_err(|e| ShelfError::Serialization(e.to_string()))
    }

    fn decode(&self, doc: Value) -> ShelfResult<T> {
        serde_json::from_value(doc).map_err(|e| {
            ShelfError::Serialization(format!(
                "malformed document in {}: {e}",
                self.collection
            ))
        })
    }

    pub async fn insert_one(&self, value: &T) -> ShelfResult<String> {
        let doc = self.encode(value)?;
        self.store.insert_one(self.collection, doc).await
    }

    pub async fn find_one(&self, filter: Filter) -> ShelfResult<Option<T>> {
        match self.store.find_one(self.collection, filter).await? {
            Some(doc) => Ok(Some(self.decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_many(&self, filter: Filter) -> ShelfResult<Vec<T>> {
        self.store
            .find_many(self.collection, filter)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc))
            .collect()
    }

    pub async fn update_one(&self, filter: Filter, set: Value) -> ShelfResult<UpdateOutcome> {
        self.store.update_one(self.collection, filter, set).await
    }

    pub async fn delete_one(&self, filter: Filter) -> ShelfResult<u64> {
        self.store.delete_one(self.collection, filter).await
    }

    pub async fn delete_many(&self, filter: Filter) -> ShelfResult<u64> {
        self.store.delete_many(self.collection, filter).await
    }

    pub async fn estimated_count(&self) -> ShelfResult<u64> {
        self.store.estimated_count(self.collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names_match_store() {
        assert_eq!(Collection::Users.as_str(), "users");
        assert_eq!(Collection::OldBooks.as_str(), "oldBook");
        assert_eq!(Collection::Reviews.as_str(), "review");
    }

    #[test]
    fn test_ensure_document_id_assigns_when_absent() {
        let mut doc = json!({ "email": "a@b.c" });
        let id = ensure_document_id(&mut doc).unwrap();
        assert_eq!(doc["_id"], json!(id));
        assert!(!id.is_empty());
    }

    #[test]
    fn test_ensure_document_id_keeps_existing() {
        let mut doc = json!({ "_id": "fixed", "email": "a@b.c" });
        assert_eq!(ensure_document_id(&mut doc).unwrap(), "fixed");
    }

    #[test]
    fn test_ensure_document_id_rejects_non_object() {
        let mut doc = json!([1, 2, 3]);
        assert!(ensure_document_id(&mut doc).is_err());

        let mut doc = json!({ "_id": 7 });
        assert!(ensure_document_id(&mut doc).is_err());
    }
}
