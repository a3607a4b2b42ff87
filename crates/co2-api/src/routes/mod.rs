mod api;
mod health;
mod pages;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/relations", get(pages::relations))
        .route("/collections", get(pages::collections))
        .route("/healthz", get(health::healthz))
        .route("/api/v1/queries", get(api::list_queries))
        .route("/api/v1/queries/{key}/options", get(api::query_options))
        .route("/api/v1/queries/{key}/results", get(api::query_results))
        .route("/api/v1/collections", get(api::list_collections))
        .route("/api/v1/collections/{name}", get(api::view_collection))
        .route("/api/v1/cache/invalidate", post(api::invalidate_cache))
}
