//! Server module for the toy gateway's HTTP surface
//!
//! This module provides:
//! - `handlers`: one handler per route, each forwarding a typed query to the store
//! - `router`: the route table
//! - `ServerBuilder`: wires a store into the router and serves it

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::{ServerBuilder, bootstrap_store};
pub use handlers::AppState;
pub use router::build_toy_routes;
