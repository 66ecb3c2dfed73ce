//! MongoDB storage implementation for document stores.

use async_trait::async_trait;
use bson::{Bson, Document, Uuid, doc};
use futures::{TryStreamExt, stream::iter, StreamExt};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};

use doclife_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{LifecycleError, LifecycleResult},
    pipeline::Pipeline,
    query::{Expr, Query, SortDirection},
    update::Update,
};

use crate::{query::MongoQueryTranslator, sanitize};

/// MongoDB-backed implementation of the [`StoreBackend`] trait.
///
/// Documents are stored one collection per document type, keyed by a UUID
/// `_id`. Keys are escaped on write and unescaped on read (see
/// [`sanitize`](crate::sanitize)); the `_id` key itself is stripped from
/// values handed back to the lifecycle layer.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&sanitize::escape(collection_name))
    }

    fn prepare_document(&self, id: &Uuid, document: &Bson) -> LifecycleResult<Document> {
        Ok(Document::from_iter(
            sanitize::escape_value(document)
                .as_document()
                .cloned()
                .ok_or_else(|| LifecycleError::InvalidDocument("Expected document".into()))?
                .into_iter()
                .chain(vec![("_id".to_string(), id.into())]),
        ))
    }

    fn restore_document(&self, document: &Document) -> LifecycleResult<Bson> {
        Ok(sanitize::unescape_value(&Bson::Document(Document::from_iter(
            document
                .clone()
                .into_iter()
                .filter(|(k, _)| k != "_id"),
        ))))
    }

    fn set_specification(update: &Update) -> Document {
        Document::from_iter(
            update
                .sets()
                .iter()
                .map(|(field, value)| (sanitize::escape(field), sanitize::escape_value(value))),
        )
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()> {
        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| self.prepare_document(id, doc))
                    .collect::<LifecycleResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn update_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()> {
        iter(documents)
            .then(async |(id, doc)| {
                let result = self
                    .get_collection(collection)
                    .replace_one(
                        doc! { "_id": id },
                        self.prepare_document(&id, &doc)?,
                    )
                    .await
                    .map_err(|e| LifecycleError::Backend(e.to_string()))?;

                // Match the in-memory backend: replacing a missing id is an
                // error, not a silent no-op.
                if result.matched_count == 0 {
                    return Err(LifecycleError::DocumentNotFound(
                        id.to_string(),
                        collection.to_string(),
                    ));
                }

                Ok(())
            })
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<Uuid>, collection: &str) -> LifecycleResult<()> {
        self.get_collection(collection)
            .delete_many(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<Uuid>, collection: &str) -> LifecycleResult<Vec<Bson>> {
        Ok(self
            .get_collection(collection)
            .find(doc! { "_id": { "$in": ids } })
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .into_iter()
            .map(|doc| self.restore_document(&doc))
            .collect::<LifecycleResult<Vec<Bson>>>()?)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> LifecycleResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        Ok(self
            .get_collection(collection)
            .find(MongoQueryTranslator.filter_document(query.effective_filter())?)
            .with_options(options)
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .into_iter()
            .map(|doc| self.restore_document(&doc))
            .collect::<LifecycleResult<Vec<Bson>>>()?)
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<u64> {
        self.get_collection(collection)
            .count_documents(MongoQueryTranslator.filter_document(filter.as_ref())?)
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))
    }

    async fn distinct_values(
        &self,
        field: &str,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>> {
        Ok(self
            .get_collection(collection)
            .distinct(
                sanitize::escape(field),
                MongoQueryTranslator.filter_document(filter.as_ref())?,
            )
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .iter()
            .map(sanitize::unescape_value)
            .collect())
    }

    async fn update_where(
        &self,
        filter: Option<Expr>,
        update: Update,
        multi: bool,
        collection: &str,
    ) -> LifecycleResult<u64> {
        let filter = MongoQueryTranslator.filter_document(filter.as_ref())?;
        let specification = doc! { "$set": Self::set_specification(&update) };
        let target = self.get_collection(collection);

        let result = if multi {
            target
                .update_many(filter, specification)
                .await
                .map_err(|e| LifecycleError::Backend(e.to_string()))?
        } else {
            target
                .update_one(filter, specification)
                .await
                .map_err(|e| LifecycleError::Backend(e.to_string()))?
        };

        Ok(result.modified_count)
    }

    async fn aggregate_documents(
        &self,
        pipeline: Pipeline,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>> {
        Ok(self
            .get_collection(collection)
            .aggregate(MongoQueryTranslator.pipeline_documents(&pipeline)?)
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .into_iter()
            .map(|doc| Ok(sanitize::unescape_value(&Bson::Document(doc))))
            .collect::<LifecycleResult<Vec<Bson>>>()?)
    }

    async fn create_collection(&self, name: &str) -> LifecycleResult<()> {
        self.client
            .database(&self.database)
            .create_collection(sanitize::escape(name))
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> LifecycleResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> LifecycleResult<Vec<String>> {
        Ok(self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(|e| LifecycleError::Backend(e.to_string()))?
            .into_iter()
            .map(|name| sanitize::unescape(&name))
            .collect())
    }

    async fn shutdown(self) -> LifecycleResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> LifecycleResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| LifecycleError::Initialization(e.to_string()))?,
            )
            .map_err(|e| LifecycleError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
