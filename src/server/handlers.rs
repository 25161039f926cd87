//! HTTP handlers for the toy routes
//!
//! Each handler builds one typed query value, hands it to the shared
//! [`ToyStore`] and returns the store's answer as JSON. Missing records are
//! not errors: get-by-id answers `null`, update and delete answer zero counts.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::error::{GatewayResult, RequestError};
use crate::core::query::{
    DeleteAck, FindQuery, InsertAck, ListLimit, ListParams, PriceSort, QueryPairs, SellerParams,
    ToyFilter, ToyId, ToyUpdate, UpdateAck,
};
use crate::core::store::ToyStore;
use crate::core::toy::{document_to_json, json_to_document};

/// Message returned by `GET /`
pub const LIVENESS_MESSAGE: &str = "driven is running";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ToyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ToyStore>) -> Self {
        Self { store }
    }

    async fn find(&self, query: FindQuery) -> GatewayResult<Json<Vec<Value>>> {
        let toys = self.store.find(query).await?;
        Ok(Json(toys.into_iter().map(document_to_json).collect()))
    }
}

type PathParam = Result<Path<String>, PathRejection>;
type QueryParams = Result<Query<QueryPairs>, QueryRejection>;

fn path_value(path: PathParam) -> Result<String, RequestError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| RequestError::InvalidParameter {
            message: rejection.body_text(),
        })
}

fn query_pairs(query: QueryParams) -> Result<QueryPairs, RequestError> {
    query
        .map(|Query(pairs)| pairs)
        .map_err(|rejection| RequestError::InvalidParameter {
            message: rejection.body_text(),
        })
}

fn parse_id(path: PathParam) -> Result<ToyId, RequestError> {
    path_value(path)?.parse()
}

fn body_value(body: Result<Json<Value>, JsonRejection>) -> Result<Value, RequestError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| RequestError::InvalidBody {
            message: rejection.body_text(),
        })
}

/// `GET /`
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// `GET /health`: ping the store
pub async fn health(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

/// `GET /toys?limit=N`
pub async fn list_toys(
    State(state): State<AppState>,
    query: QueryParams,
) -> GatewayResult<Json<Vec<Value>>> {
    let params = ListParams::from_pairs(&query_pairs(query)?);
    let limit = params.limit.as_deref().and_then(ListLimit::parse);
    tracing::debug!(limit = ?limit.map(|l| l.get()), "List toys");

    state.find(FindQuery::all().with_limit(limit)).await
}

/// `GET /toySearchByName/{text}`
pub async fn search_by_name(
    State(state): State<AppState>,
    text: PathParam,
) -> GatewayResult<Json<Vec<Value>>> {
    let text = path_value(text)?;
    tracing::debug!(text = %text, "Search toys by name");

    state.find(FindQuery::new(ToyFilter::NameMatches(text))).await
}

/// `GET /toys/{id}`
pub async fn get_toy(
    State(state): State<AppState>,
    id: PathParam,
) -> GatewayResult<Json<Option<Value>>> {
    let id = parse_id(id)?;
    tracing::debug!(id = %id, "Get toy");

    let toy = state.store.find_one(id).await?;
    Ok(Json(toy.map(document_to_json)))
}

/// `GET /CategoryToys/{category}`
pub async fn list_by_category(
    State(state): State<AppState>,
    category: PathParam,
) -> GatewayResult<Json<Vec<Value>>> {
    let category = path_value(category)?;
    tracing::debug!(category = %category, "List toys by category");

    state.find(FindQuery::new(ToyFilter::Category(category))).await
}

/// `GET /myToys?email=&sort=`
pub async fn list_by_seller(
    State(state): State<AppState>,
    query: QueryParams,
) -> GatewayResult<Json<Vec<Value>>> {
    let params = SellerParams::from_pairs(&query_pairs(query)?);
    let sort = params.sort.as_deref().and_then(PriceSort::parse);
    tracing::debug!(email = ?params.email, sort = ?sort, "List toys by seller");

    state.find(FindQuery::seller(params.email, sort)).await
}

/// `POST /toys`
pub async fn create_toy(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<InsertAck>> {
    let toy = json_to_document(body_value(body)?)?;

    let ack = state.store.insert_one(toy).await?;
    tracing::info!(id = %ack.inserted_id, "Toy created");

    Ok(Json(ack))
}

/// `PATCH /updateToy/{id}`
pub async fn update_toy(
    State(state): State<AppState>,
    id: PathParam,
    body: Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<UpdateAck>> {
    let id = parse_id(id)?;
    let update = ToyUpdate::from_body(&body_value(body)?)?;

    let ack = state.store.update_one(id, update).await?;
    tracing::info!(
        id = %id,
        matched = ack.matched_count,
        modified = ack.modified_count,
        "Toy updated"
    );

    Ok(Json(ack))
}

/// `DELETE /toys/{id}`
pub async fn delete_toy(
    State(state): State<AppState>,
    id: PathParam,
) -> GatewayResult<Json<DeleteAck>> {
    let id = parse_id(id)?;

    let ack = state.store.delete_one(id).await?;
    tracing::info!(id = %id, deleted = ack.deleted_count, "Toy deleted");

    Ok(Json(ack))
}
