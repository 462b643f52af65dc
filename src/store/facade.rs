use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use mongodb::{Collection, Cursor, IndexModel};

use crate::error::AppResult;
use crate::store::connection::ConnectionManager;

/// Optional narrowing applied to a `find`. Unset fields are left to the
/// driver's defaults.
#[derive(Debug, Clone, Default)]
pub struct FindOpts {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
}

/// Generic document-set operations parameterized by collection name.
///
/// Every operation is a thin pass-through to the driver's equivalent call
/// and requires an active connection. Query semantics are not encoded here;
/// filter, projection, and pipeline construction belong to callers.
#[derive(Clone)]
pub struct DocumentStore {
    connection: Arc<ConnectionManager>,
}

impl DocumentStore {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    async fn collection(&self, name: &str) -> AppResult<Collection<Document>> {
        Ok(self.connection.database().await?.collection::<Document>(name))
    }

    /// Materialized ordered sequence of matching documents.
    pub async fn find(
        &self,
        collection: &str,
        filter: Document,
        opts: FindOpts,
    ) -> AppResult<Vec<Document>> {
        let coll = self.collection(collection).await?;
        let mut find = coll.find(filter);
        if let Some(projection) = opts.projection {
            find = find.projection(projection);
        }
        if let Some(sort) = opts.sort {
            find = find.sort(sort);
        }
        if let Some(limit) = opts.limit {
            find = find.limit(limit);
        }
        if let Some(skip) = opts.skip {
            find = find.skip(skip);
        }
        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    /// The single matching document, or `None`.
    pub async fn find_one(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> AppResult<Option<Document>> {
        let coll = self.collection(collection).await?;
        let mut find = coll.find_one(filter);
        if let Some(projection) = projection {
            find = find.projection(projection);
        }
        Ok(find.await?)
    }

    /// Persist one document. The driver assigns a fresh `_id` when the
    /// document lacks one; the result carries the generated identifier.
    pub async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> AppResult<InsertOneResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.insert_one(document).await?)
    }

    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> AppResult<InsertManyResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.insert_many(documents).await?)
    }

    pub async fn delete_one(&self, collection: &str, filter: Document) -> AppResult<DeleteResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.delete_one(filter).await?)
    }

    pub async fn delete_many(&self, collection: &str, filter: Document) -> AppResult<DeleteResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.delete_many(filter).await?)
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> AppResult<UpdateResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.update_one(filter, update).await?)
    }

    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> AppResult<UpdateResult> {
        let coll = self.collection(collection).await?;
        Ok(coll.update_many(filter, update).await?)
    }

    pub async fn count(&self, collection: &str, filter: Document) -> AppResult<u64> {
        let coll = self.collection(collection).await?;
        Ok(coll.count_documents(filter).await?)
    }

    pub async fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: Document,
    ) -> AppResult<Vec<Bson>> {
        let coll = self.collection(collection).await?;
        Ok(coll.distinct(field, filter).await?)
    }

    /// Run a pipeline and materialize the full result set.
    pub async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> AppResult<Vec<Document>> {
        let cursor = self.aggregate_cursor(collection, pipeline).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Run a pipeline and hand the cursor to the caller.
    pub async fn aggregate_cursor(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> AppResult<Cursor<Document>> {
        let coll = self.collection(collection).await?;
        Ok(coll.aggregate(pipeline).await?)
    }

    /// Create an index on the given keys, returning the created index name.
    pub async fn create_index(&self, collection: &str, keys: Document) -> AppResult<String> {
        let coll = self.collection(collection).await?;
        let model = IndexModel::builder().keys(keys).build();
        let result = coll.create_index(model).await?;
        Ok(result.index_name)
    }

    pub async fn collection_exists(&self, name: &str) -> AppResult<bool> {
        let names = self.connection.database().await?.list_collection_names().await?;
        Ok(names.iter().any(|existing| existing == name))
    }

    /// Storage statistics for a collection, as reported by the store.
    pub async fn stats(&self, collection: &str) -> AppResult<Document> {
        let database = self.connection.database().await?;
        Ok(database.run_command(doc! { "collStats": collection }).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn unconnected_store() -> DocumentStore {
        DocumentStore::new(Arc::new(ConnectionManager::new()))
    }

    #[tokio::test]
    async fn find_requires_connection() {
        let store = unconnected_store();
        let err = store.find("movies", doc! {}, FindOpts::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn find_one_requires_connection() {
        let store = unconnected_store();
        let err = store.find_one("movies", doc! {}, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn insert_one_requires_connection() {
        let store = unconnected_store();
        let err = store.insert_one("comments", doc! { "text": "hi" }).await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn count_requires_connection() {
        let store = unconnected_store();
        let err = store.count("movies", doc! {}).await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn aggregate_requires_connection() {
        let store = unconnected_store();
        let pipeline = vec![doc! { "$match": { "year": 1999 } }];
        let err = store.aggregate("movies", pipeline).await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn stats_requires_connection() {
        let store = unconnected_store();
        let err = store.stats("movies").await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }
}
