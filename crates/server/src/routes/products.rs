use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{EntityId, Product, ProductInput};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Create a product
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(Json(state.products.create(input).await?))
}

/// List all products
pub async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<Product>>, JsonApiError> {
    Ok(Json(state.products.find_all().await?))
}

/// Update a product, including its sku when no other product holds it
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, JsonApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(Json(state.products.update(&EntityId::from(id), input).await?))
}

/// Delete a product
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.products.delete(&EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
