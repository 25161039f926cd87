//! Core module containing the record model, query values and storage trait

pub mod error;
pub mod query;
pub mod store;
pub mod toy;

pub use error::{ConfigError, GatewayError, GatewayResult, RequestError, StorageError};
pub use query::{
    DeleteAck, FindQuery, InsertAck, ListLimit, ListParams, PriceSort, QueryPairs, SellerParams,
    ToyFilter, ToyId, ToyUpdate, UpdateAck,
};
pub use store::ToyStore;
pub use toy::Toy;
