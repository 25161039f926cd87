//! # driven
//!
//! A REST gateway over a single MongoDB collection of toys. Each route maps to
//! exactly one query (find, findOne, insertOne, updateOne, deleteOne) and
//! answers with the raw result.
//!
//! ## Routes
//!
//! | Method | Path | Query |
//! |---|---|---|
//! | GET | `/toys?limit=N` | find, optional cap |
//! | GET | `/toySearchByName/{text}` | find, case-insensitive name regex |
//! | GET | `/toys/{id}` | findOne |
//! | GET | `/CategoryToys/{category}` | find, exact category |
//! | GET | `/myToys?email=&sort=asc\|desc` | find by seller, numeric price sort |
//! | POST | `/toys` | insertOne |
//! | PATCH | `/updateToy/{id}` | updateOne on price, availableQuantity, details |
//! | DELETE | `/toys/{id}` | deleteOne |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use driven::prelude::*;
//!
//! let config = AppConfig::load()?;
//! let store = MongoToyStore::connect(&config.database).await?;
//! bootstrap_store(&store).await;
//!
//! ServerBuilder::new()
//!     .with_store(store)
//!     .serve(&config.listen_addr()?.to_string())
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DeleteAck, FindQuery, GatewayError, GatewayResult, InsertAck, ListLimit, PriceSort,
        RequestError, StorageError, Toy, ToyFilter, ToyId, ToyStore, ToyUpdate, UpdateAck,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryToyStore, MongoToyStore};

    // === Config ===
    pub use crate::config::{AppConfig, DatabaseConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, bootstrap_store, build_toy_routes};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
