//! Storage capability consumed by the router

use crate::core::error::GatewayResult;
use crate::core::query::{DeleteAck, FindQuery, InsertAck, ToyId, ToyUpdate, UpdateAck};
use crate::core::toy::Toy;
use async_trait::async_trait;

/// Storage trait for the toy collection
///
/// Each method maps to exactly one backend query. Implementations are shared
/// across requests behind an `Arc` and must be safe for concurrent use.
#[async_trait]
pub trait ToyStore: Send + Sync {
    /// Find all records matching the query, honoring its sort and limit
    async fn find(&self, query: FindQuery) -> GatewayResult<Vec<Toy>>;

    /// Fetch one record by id, `None` if it does not exist
    async fn find_one(&self, id: ToyId) -> GatewayResult<Option<Toy>>;

    /// Insert a record unmodified, assigning an `_id` when it has none
    async fn insert_one(&self, toy: Toy) -> GatewayResult<InsertAck>;

    /// Apply a partial update to one record
    async fn update_one(&self, id: ToyId, update: ToyUpdate) -> GatewayResult<UpdateAck>;

    /// Delete one record by id
    async fn delete_one(&self, id: ToyId) -> GatewayResult<DeleteAck>;

    /// Create the indexes the queries rely on. Safe to call on every startup.
    async fn ensure_indexes(&self) -> GatewayResult<()>;

    /// Check that the backend is reachable
    async fn ping(&self) -> GatewayResult<()>;
}
