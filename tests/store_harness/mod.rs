//! Shared test harness for toy store backends
//!
//! Provides sample toys, a `TestServer` factory over the full router, and the
//! `gateway_tests!` macro that validates a `ToyStore` through HTTP round-trips:
//! JSON → HTTP request → handler → ToyStore → HTTP response → JSON.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! gateway_tests!(InMemoryToyStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod rest_tests;

use axum_test::TestServer;
use driven::core::ToyStore;
use driven::server::ServerBuilder;
use serde_json::{Value, json};
use std::sync::Arc;

/// Build a test server over the full router (CORS and tracing layers included).
pub fn test_server(store: Arc<dyn ToyStore>) -> TestServer {
    let app = ServerBuilder::new()
        .with_shared_store(store)
        .build()
        .expect("router should build");
    TestServer::new(app).expect("test server should start")
}

/// A toy body as a seller would post it.
pub fn toy(name: &str, category: &str, seller: &str, price: Value) -> Value {
    json!({
        "toyName": name,
        "category": category,
        "sellerEmail": seller,
        "sellerName": "Test Seller",
        "price": price,
        "availableQuantity": 10,
        "details": format!("{} details", name),
        "rating": 4.5
    })
}

/// POST a toy and return its new id.
pub async fn create(server: &TestServer, body: Value) -> String {
    let response = server.post("/toys").json(&body).await;
    response.assert_status_ok();
    let ack: Value = response.json();
    assert_eq!(ack["acknowledged"], true);
    ack["insertedId"]
        .as_str()
        .expect("insertedId should be a hex string")
        .to_string()
}

/// Names of a list response, in response order.
pub fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|t| t["toyName"].as_str().unwrap_or_default().to_string())
        .collect()
}
