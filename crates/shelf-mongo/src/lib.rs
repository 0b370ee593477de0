//! # shelf-mongo
//!
//! MongoDB implementation of the [`DocumentStore`] trait.
//!
//! Every driver call runs under a bounded timeout; a deadline miss surfaces
//! as `ShelfError::Timeout`, any other driver failure as `ShelfError::Store`.
//! Documents keep the string `_id` the store layer assigns, so ids look the
//! same here as in the in-memory backend.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, to_document, Document};
use mongodb::{Client, Database};
use serde_json::Value;
use shelf_core::{
    ensure_document_id, Collection, DocumentStore, Filter, ShelfError, ShelfResult, UpdateOutcome,
};
use std::future::IntoFuture;
use std::time::Duration;
use tracing::{debug, info};

/// MongoDB-backed document store
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
    op_timeout: Duration,
}

impl MongoStore {
    /// Connect to the cluster and select the service database.
    ///
    /// The driver connects lazily; the first store call will surface any
    /// connectivity problem.
    pub async fn connect(uri: &str, db_name: &str, op_timeout: Duration) -> ShelfResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| ShelfError::Configuration(format!("invalid MongoDB URI: {e}")))?;
        let db = client.database(db_name);

        info!(db = db_name, timeout = ?op_timeout, "connected document store");

        Ok(Self {
            client,
            db,
            op_timeout,
        })
    }

    /// Release the connection pool on shutdown
    pub async fn shutdown(self) {
        info!("shutting down document store");
        self.client.shutdown().await;
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.as_str())
    }

    /// Run one driver call under the configured deadline
    async fn run<T>(
        &self,
        collection: Collection,
        op: &str,
        fut: impl IntoFuture<Output = Result<T, mongodb::error::Error>>,
    ) -> ShelfResult<T> {
        match tokio::time::timeout(self.op_timeout, fut.into_future()).await {
            Err(_) => Err(ShelfError::Timeout(format!(
                "{op} on {collection} exceeded {:?}",
                self.op_timeout
            ))),
            Ok(Err(e)) => Err(ShelfError::Store(format!("{op} on {collection}: {e}"))),
            Ok(Ok(value)) => Ok(value),
        }
    }
}

fn json_to_document(value: &Value) -> ShelfResult<Document> {
    to_document(value).map_err(|e| ShelfError::Serialization(format!("json to bson: {e}")))
}

fn document_to_json(doc: &Document) -> ShelfResult<Value> {
    serde_json::to_value(doc).map_err(|e| ShelfError::Serialization(format!("bson to json: {e}")))
}

fn filter_to_document(filter: &Filter) -> ShelfResult<Document> {
    match filter {
        Filter::All => Ok(doc! {}),
        Filter::Id(id) => Ok(doc! { "_id": id }),
        Filter::Eq(field, value) => {
            let bson = to_bson(value)
                .map_err(|e| ShelfError::Serialization(format!("filter value: {e}")))?;
            let mut document = Document::new();
            document.insert(field.clone(), bson);
            Ok(document)
        }
        Filter::IdIn(ids) => Ok(doc! { "_id": { "$in": ids.clone() } }),
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: Collection, mut doc: Value) -> ShelfResult<String> {
        let id = ensure_document_id(&mut doc)?;
        let document = json_to_document(&doc)?;
        let coll = self.collection(collection);

        self.run(collection, "insert_one", coll.insert_one(document))
            .await?;
        debug!(%collection, id = %id, "inserted document");
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Filter,
    ) -> ShelfResult<Option<Value>> {
        let filter_doc = filter_to_document(&filter)?;
        let coll = self.collection(collection);

        let found = self
            .run(collection, "find_one", coll.find_one(filter_doc))
            .await?;
        found.map(|doc| document_to_json(&doc)).transpose()
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> ShelfResult<Vec<Value>> {
        let filter_doc = filter_to_document(&filter)?;
        let coll = self.collection(collection);

        let docs: Vec<Document> = self
            .run(collection, "find", async move {
                let cursor = coll.find(filter_doc).await?;
                cursor.try_collect().await
            })
            .await?;

        debug!(%collection, count = docs.len(), "fetched documents");
        docs.iter().map(document_to_json).collect()
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Filter,
        set: Value,
    ) -> ShelfResult<UpdateOutcome> {
        let filter_doc = filter_to_document(&filter)?;
        let update = doc! { "$set": json_to_document(&set)? };
        let coll = self.collection(collection);

        let result = self
            .run(collection, "update_one", coll.update_one(filter_doc, update))
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Filter) -> ShelfResult<u64> {
        let filter_doc = filter_to_document(&filter)?;
        let coll = self.collection(collection);

        let result = self
            .run(collection, "delete_one", coll.delete_one(filter_doc))
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, collection: Collection, filter: Filter) -> ShelfResult<u64> {
        let filter_doc = filter_to_document(&filter)?;
        let coll = self.collection(collection);

        let result = self
            .run(collection, "delete_many", coll.delete_many(filter_doc))
            .await?;
        Ok(result.deleted_count)
    }

    async fn estimated_count(&self, collection: Collection) -> ShelfResult<u64> {
        let coll = self.collection(collection);
        self.run(
            collection,
            "estimated_document_count",
            coll.estimated_document_count(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_conversion() {
        let all = filter_to_document(&Filter::All).unwrap();
        assert!(all.is_empty());

        let by_id = filter_to_document(&Filter::by_id("abc")).unwrap();
        assert_eq!(by_id, doc! { "_id": "abc" });

        let by_email = filter_to_document(&Filter::field("email", "a@x.com")).unwrap();
        assert_eq!(by_email, doc! { "email": "a@x.com" });

        let id_in =
            filter_to_document(&Filter::IdIn(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(id_in, doc! { "_id": { "$in": ["a", "b"] } });
    }

    async fn disconnected_store(op_timeout: Duration) -> MongoStore {
        // the driver connects lazily, so a test store never needs a cluster
        let client = Client::with_uri_str("mongodb://127.0.0.1:1")
            .await
            .unwrap();
        let db = client.database("test");
        MongoStore {
            client,
            db,
            op_timeout,
        }
    }

    #[tokio::test]
    async fn test_deadline_miss_is_timeout_not_store() {
        let store = disconnected_store(Duration::from_millis(10)).await;

        let err = store
            .run(
                Collection::Books,
                "find_one",
                std::future::pending::<Result<(), mongodb::error::Error>>(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ShelfError::Timeout(_)), "got {err:?}");
        assert_eq!(err.status_code(), 504);
    }

    #[tokio::test]
    async fn test_driver_failure_is_store_error() {
        let store = disconnected_store(Duration::from_secs(5)).await;

        let err = store
            .run(Collection::Books, "find_one", async {
                Err::<(), _>(mongodb::error::Error::custom("connection reset"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ShelfError::Store(_)), "got {err:?}");
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_json_document_round_trip() {
        let value = json!({
            "_id": "p1",
            "email": "a@x.com",
            "price": 19.99,
            "cartIds": ["c1", "c2"]
        });

        let document = json_to_document(&value).unwrap();
        let back = document_to_json(&document).unwrap();
        assert_eq!(back["email"], json!("a@x.com"));
        assert_eq!(back["cartIds"], json!(["c1", "c2"]));
    }
}
