//! Storage implementations for different backends

pub mod in_memory;
pub mod mongodb;

pub use in_memory::InMemoryToyStore;
pub use mongodb::MongoToyStore;
