//! REST test macro for toy store backends.

/// Generate a REST test suite for a storage backend.
///
/// `$store_factory` must produce an `impl ToyStore + 'static` backed by an
/// empty collection.
///
/// # Generated Tests
///
/// ## Reads
/// - `test_list_all` / `test_list_limit` / `test_list_non_numeric_limit`
/// - `test_search_by_name_case_insensitive`
/// - `test_list_repeated_limit_uses_first`
/// - `test_filter_by_category_exact` / `test_category_ignores_leading_zeros`
/// - `test_seller_filter_and_numeric_price_sort` / `test_seller_match_is_collated`
///
/// ## Writes
/// - `test_create_then_get` / `test_create_keeps_large_integers`
/// - `test_update_restricted_fields`
/// - `test_delete`
///
/// ## Missing records
/// - `test_missing_id_is_empty_success`
#[macro_export]
macro_rules! gateway_tests {
    ($store_factory:expr) => {
        mod gateway_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let store = $store_factory;
                store_harness::test_server(Arc::new(store))
            }

            async fn seed_five(server: &TestServer) {
                for (name, price) in [
                    ("Racecar", json!(25)),
                    ("Teddy Bear", json!(15)),
                    ("Robot", json!(40)),
                    ("Puzzle", json!(10)),
                    ("Kite", json!(8)),
                ] {
                    store_harness::create(
                        server,
                        store_harness::toy(name, "Misc", "seller@test.com", price),
                    )
                    .await;
                }
            }

            // ==============================================================
            // Liveness
            // ==============================================================

            #[tokio::test]
            async fn test_liveness() {
                let server = make_server().await;
                let response = server.get("/").await;
                response.assert_status_ok();
                assert_eq!(response.text(), "driven is running");
            }

            // ==============================================================
            // List
            // ==============================================================

            #[tokio::test]
            async fn test_list_all() {
                let server = make_server().await;
                seed_five(&server).await;

                let body: Value = server.get("/toys").await.json();
                assert_eq!(
                    store_harness::names(&body),
                    vec!["Racecar", "Teddy Bear", "Robot", "Puzzle", "Kite"]
                );
            }

            #[tokio::test]
            async fn test_list_limit() {
                let server = make_server().await;
                seed_five(&server).await;

                let response = server.get("/toys").add_query_param("limit", 2).await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(store_harness::names(&body), vec!["Racecar", "Teddy Bear"]);
            }

            #[tokio::test]
            async fn test_list_non_numeric_limit() {
                let server = make_server().await;
                seed_five(&server).await;

                let response = server.get("/toys").add_query_param("limit", "abc").await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body.as_array().unwrap().len(), 5);
            }

            #[tokio::test]
            async fn test_list_repeated_limit_uses_first() {
                let server = make_server().await;
                seed_five(&server).await;

                let response = server.get("/toys?limit=2&limit=3").await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(store_harness::names(&body), vec!["Racecar", "Teddy Bear"]);
            }

            // ==============================================================
            // Search / filter
            // ==============================================================

            #[tokio::test]
            async fn test_search_by_name_case_insensitive() {
                let server = make_server().await;
                seed_five(&server).await;

                let body: Value = server.get("/toySearchByName/CAR").await.json();
                assert_eq!(store_harness::names(&body), vec!["Racecar"]);

                let body: Value = server.get("/toySearchByName/zzz").await.json();
                assert!(body.as_array().unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_filter_by_category_exact() {
                let server = make_server().await;
                for (name, category) in [
                    ("Fire Truck", "Trucks"),
                    ("Dump Truck", "trucks"),
                    ("Sedan", "Cars"),
                ] {
                    store_harness::create(
                        &server,
                        store_harness::toy(name, category, "a@test.com", json!(10)),
                    )
                    .await;
                }

                let body: Value = server.get("/CategoryToys/Trucks").await.json();
                assert_eq!(store_harness::names(&body), vec!["Fire Truck"]);
            }

            #[tokio::test]
            async fn test_category_ignores_leading_zeros() {
                let server = make_server().await;
                for (name, category) in [("padded", "Level 01"), ("plain", "Level 1")] {
                    store_harness::create(
                        &server,
                        store_harness::toy(name, category, "a@test.com", json!(10)),
                    )
                    .await;
                }

                let body: Value = server.get("/CategoryToys/Level%201").await.json();
                assert_eq!(store_harness::names(&body), vec!["plain"]);
            }

            #[tokio::test]
            async fn test_seller_match_is_collated() {
                let server = make_server().await;
                for (name, seller) in [
                    ("padded", "a01@test.com"),
                    ("plain", "a1@test.com"),
                    ("other", "b1@test.com"),
                ] {
                    store_harness::create(
                        &server,
                        store_harness::toy(name, "Misc", seller, json!(10)),
                    )
                    .await;
                }

                let body: Value = server
                    .get("/myToys")
                    .add_query_param("email", "a1@test.com")
                    .await
                    .json();
                assert_eq!(store_harness::names(&body), vec!["padded", "plain"]);
            }

            #[tokio::test]
            async fn test_seller_filter_and_numeric_price_sort() {
                let server = make_server().await;
                for (name, seller, price) in [
                    ("ten", "me@test.com", "10"),
                    ("nine", "me@test.com", "9"),
                    ("other", "you@test.com", "1"),
                    ("hundred", "me@test.com", "100"),
                ] {
                    store_harness::create(
                        &server,
                        store_harness::toy(name, "Misc", seller, json!(price)),
                    )
                    .await;
                }

                let asc: Value = server
                    .get("/myToys")
                    .add_query_param("email", "me@test.com")
                    .add_query_param("sort", "asc")
                    .await
                    .json();
                assert_eq!(store_harness::names(&asc), vec!["nine", "ten", "hundred"]);

                let desc: Value = server
                    .get("/myToys")
                    .add_query_param("email", "me@test.com")
                    .add_query_param("sort", "desc")
                    .await
                    .json();
                assert_eq!(store_harness::names(&desc), vec!["hundred", "ten", "nine"]);

                // No email: every seller
                let all: Value = server.get("/myToys").await.json();
                assert_eq!(all.as_array().unwrap().len(), 4);
            }

            // ==============================================================
            // Writes
            // ==============================================================

            #[tokio::test]
            async fn test_create_then_get() {
                let server = make_server().await;
                let body = store_harness::toy("Robot", "Robots", "a@test.com", json!(40));
                let id = store_harness::create(&server, body.clone()).await;

                let response = server.get(&format!("/toys/{}", id)).await;
                response.assert_status_ok();
                let fetched: Value = response.json();

                assert_eq!(fetched["_id"], id);
                for (key, value) in body.as_object().unwrap() {
                    assert_eq!(&fetched[key], value, "field {} differs", key);
                }
            }

            #[tokio::test]
            async fn test_create_keeps_large_integers() {
                let server = make_server().await;
                let body = store_harness::toy(
                    "Gold Robot",
                    "Robots",
                    "a@test.com",
                    json!(18446744073709551615_u64),
                );
                let id = store_harness::create(&server, body).await;

                let fetched: Value = server.get(&format!("/toys/{}", id)).await.json();
                assert_eq!(fetched["price"].as_f64(), Some(u64::MAX as f64));
            }

            #[tokio::test]
            async fn test_update_restricted_fields() {
                let server = make_server().await;
                let id = store_harness::create(
                    &server,
                    store_harness::toy("Robot", "Robots", "a@test.com", json!(40)),
                )
                .await;

                let response = server
                    .patch(&format!("/updateToy/{}", id))
                    .json(&json!({
                        "toyName": "x",
                        "price": 5,
                        "availableQuantity": 3,
                        "details": "repainted"
                    }))
                    .await;
                response.assert_status_ok();
                let ack: Value = response.json();
                assert_eq!(ack["matchedCount"], 1);
                assert_eq!(ack["modifiedCount"], 1);

                let fetched: Value = server.get(&format!("/toys/{}", id)).await.json();
                assert_eq!(fetched["toyName"], "Robot");
                assert_eq!(fetched["price"], 5);
                assert_eq!(fetched["availableQuantity"], 3);
                assert_eq!(fetched["details"], "repainted");
                assert_eq!(fetched["category"], "Robots");
            }

            #[tokio::test]
            async fn test_delete() {
                let server = make_server().await;
                let id = store_harness::create(
                    &server,
                    store_harness::toy("Kite", "Outdoor", "a@test.com", json!(8)),
                )
                .await;

                let response = server.delete(&format!("/toys/{}", id)).await;
                response.assert_status_ok();
                let ack: Value = response.json();
                assert_eq!(ack, json!({ "acknowledged": true, "deletedCount": 1 }));

                let fetched: Value = server.get(&format!("/toys/{}", id)).await.json();
                assert!(fetched.is_null());
            }

            // ==============================================================
            // Missing records
            // ==============================================================

            #[tokio::test]
            async fn test_missing_id_is_empty_success() {
                let server = make_server().await;
                let missing = "64b7f0c2a1b2c3d4e5f60718";

                let response = server.get(&format!("/toys/{}", missing)).await;
                response.assert_status(StatusCode::OK);
                assert!(response.json::<Value>().is_null());

                let response = server.delete(&format!("/toys/{}", missing)).await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>()["deletedCount"], 0);

                let response = server
                    .patch(&format!("/updateToy/{}", missing))
                    .json(&json!({ "price": 1 }))
                    .await;
                response.assert_status(StatusCode::OK);
                assert_eq!(response.json::<Value>()["matchedCount"], 0);
            }
        }
    };
}
