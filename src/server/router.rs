//! Route table for the toy gateway

use crate::server::handlers::{
    AppState, create_toy, delete_toy, get_toy, health, list_by_category, list_by_seller,
    list_toys, liveness, search_by_name, update_toy,
};
use axum::{
    Router,
    routing::{get, patch},
};

/// Build the toy routes
///
/// - GET /toys?limit=N - List toys, optionally capped
/// - POST /toys - Insert a toy
/// - GET /toys/{id} - Fetch one toy
/// - DELETE /toys/{id} - Delete one toy
/// - GET /toySearchByName/{text} - Case-insensitive name search
/// - GET /CategoryToys/{category} - Exact category match
/// - GET /myToys?email=&sort= - Toys of one seller, optionally sorted by price
/// - PATCH /updateToy/{id} - Update price, availableQuantity and details
/// - GET / and GET /health - Liveness and storage health
pub fn build_toy_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .route("/toys", get(list_toys).post(create_toy))
        .route("/toys/{id}", get(get_toy).delete(delete_toy))
        .route("/toySearchByName/{text}", get(search_by_name))
        .route("/CategoryToys/{category}", get(list_by_category))
        .route("/myToys", get(list_by_seller))
        .route("/updateToy/{id}", patch(update_toy))
        .with_state(state)
}
