//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoToyStore`, a [`ToyStore`] over a single
//! `mongodb::Collection<Document>`. The client and collection handle are
//! created once at startup and shared by every request; the driver's own
//! connection pool serves concurrent queries.
//!
//! # Query model
//!
//! A find flagged with `numeric_collation` runs under the `en_US` collation
//! with `numericOrdering: true`, so prices stored as strings sort by numeric
//! value. Other finds use the default binary comparison, which keeps category
//! matches exact. Name search relies on the `nameSearch` index created by
//! [`ToyStore::ensure_indexes`].

use crate::config::DatabaseConfig;
use crate::core::error::{GatewayError, GatewayResult, StorageError};
use crate::core::query::{DeleteAck, FindQuery, InsertAck, ToyId, ToyUpdate, UpdateAck};
use crate::core::store::ToyStore;
use crate::core::toy::{Toy, fields};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::ErrorKind;
use mongodb::options::{ClientOptions, Collation, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, IndexModel};

const BACKEND: &str = "MongoDB";

/// Name of the index on `toyName`.
pub const NAME_INDEX: &str = "nameSearch";

/// Map a driver error onto the gateway's storage errors.
///
/// Server selection failures mean no server could be reached at all; every
/// other failure is reported against the operation that raised it.
fn storage_error(operation: &'static str, err: mongodb::error::Error) -> GatewayError {
    match *err.kind {
        ErrorKind::ServerSelection { .. } => StorageError::Unavailable {
            backend: BACKEND,
            message: err.to_string(),
        },
        _ => StorageError::QueryFailed {
            backend: BACKEND,
            operation,
            message: err.to_string(),
        },
    }
    .into()
}

/// Collation for finds that request numeric ordering.
fn numeric_collation() -> Collation {
    Collation::builder()
        .locale("en_US".to_string())
        .numeric_ordering(true)
        .build()
}

/// Toy store backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use driven::config::DatabaseConfig;
/// use driven::storage::MongoToyStore;
///
/// let store = MongoToyStore::connect(&DatabaseConfig::default()).await?;
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoToyStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoToyStore {
    /// Build a client from configuration and bind the toy collection.
    ///
    /// The driver connects lazily: an unreachable server does not fail here,
    /// only the first query against it.
    pub async fn connect(config: &DatabaseConfig) -> GatewayResult<Self> {
        let uri = config.connection_uri()?;

        let mut options = ClientOptions::parse(&uri)
            .await
            .map_err(|e| storage_error("connect", e))?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.max_pool_size = Some(config.max_pool_size);
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options).map_err(|e| storage_error("connect", e))?;

        tracing::debug!(
            database = %config.name,
            collection = %config.collection,
            max_pool_size = config.max_pool_size,
            "MongoDB client created"
        );

        Ok(Self::new(client, &config.name, &config.collection))
    }

    /// Bind an existing client to `database.collection`.
    pub fn new(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { client, collection }
    }

    /// Get a reference to the underlying collection.
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

#[async_trait]
impl ToyStore for MongoToyStore {
    async fn find(&self, query: FindQuery) -> GatewayResult<Vec<Toy>> {
        let mut find = self.collection.find(query.filter.to_document());

        if query.numeric_collation {
            find = find.collation(numeric_collation());
        }
        if let Some(sort) = query.sort {
            find = find.sort(sort.to_document());
        }
        if let Some(limit) = query.limit {
            find = find.limit(limit.get());
        }

        let cursor = find.await.map_err(|e| storage_error("find", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| storage_error("find", e))
    }

    async fn find_one(&self, id: ToyId) -> GatewayResult<Option<Toy>> {
        self.collection
            .find_one(id.to_filter())
            .await
            .map_err(|e| storage_error("findOne", e))
    }

    async fn insert_one(&self, toy: Toy) -> GatewayResult<InsertAck> {
        let result = self
            .collection
            .insert_one(toy)
            .await
            .map_err(|e| storage_error("insertOne", e))?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    async fn update_one(&self, id: ToyId, update: ToyUpdate) -> GatewayResult<UpdateAck> {
        let result = self
            .collection
            .update_one(id.to_filter(), update.to_document())
            .await
            .map_err(|e| storage_error("updateOne", e))?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id,
        })
    }

    async fn delete_one(&self, id: ToyId) -> GatewayResult<DeleteAck> {
        let result = self
            .collection
            .delete_one(id.to_filter())
            .await
            .map_err(|e| storage_error("deleteOne", e))?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    /// Create the `{ toyName: 1 }` index named `nameSearch`.
    ///
    /// This method is idempotent, safe to call on every startup.
    async fn ensure_indexes(&self) -> GatewayResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { fields::TOY_NAME: 1 })
            .options(IndexOptions::builder().name(NAME_INDEX.to_string()).build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| storage_error("createIndex", e))?;

        Ok(())
    }

    async fn ping(&self) -> GatewayResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| storage_error("ping", e))?;

        Ok(())
    }
}
