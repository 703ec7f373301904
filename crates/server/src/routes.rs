pub mod employees;
pub mod products;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health, employees and products.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let employee_routes = Router::new()
        .route("/employees", get(employees::find_all).post(employees::create))
        .route(
            "/employees/:id",
            get(employees::find_by_id).put(employees::update).delete(employees::delete),
        )
        .route("/employees/document/:document", get(employees::find_by_document));

    let product_routes = Router::new()
        .route("/products", get(products::find_all).post(products::create))
        .route("/products/:id", axum::routing::put(products::update).delete(products::delete));

    Router::new()
        .route("/health", get(health))
        .merge(employee_routes)
        .merge(product_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
