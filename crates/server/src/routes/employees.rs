use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{Employee, EmployeeInput, EntityId};
use service::ServiceError;

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Create an employee
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<Json<Employee>, JsonApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(Json(state.employees.create(input).await?))
}

/// Fetch one employee by id
pub async fn find_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, JsonApiError> {
    let id = EntityId::from(id);
    let found = state
        .employees
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ServiceError::not_found_by_id::<Employee>(id.as_str()))?;
    Ok(Json(found))
}

/// Fetch one employee by document
pub async fn find_by_document(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> Result<Json<Employee>, JsonApiError> {
    Ok(Json(state.employees.find_by_document(&document).await?))
}

/// List all employees
pub async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<Employee>>, JsonApiError> {
    Ok(Json(state.employees.find_all().await?))
}

/// Update an employee's descriptive fields
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<Json<Employee>, JsonApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(Json(state.employees.update(&EntityId::from(id), input).await?))
}

/// Delete an employee
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.employees.delete(&EntityId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
