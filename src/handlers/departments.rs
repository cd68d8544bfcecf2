//! Departments are keyed by their text `dept_id`, so path keys are used as given.

use super::{JsonBody, SearchParams};
use crate::error::AppError;
use crate::model::{Department, DepartmentStats, Resource};
use crate::response::{created, deleted, MessageBody};
use crate::service::DepartmentService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(DepartmentService::list(state.store()).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(DepartmentService::search(state.store(), params.q.as_deref()).await?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Vec<DepartmentStats>>, AppError> {
    Ok(Json(DepartmentService::stats(state.store()).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(dept_id): Path<String>,
) -> Result<Json<Department>, AppError> {
    Ok(Json(DepartmentService::get(state.store(), &dept_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    Ok(created(DepartmentService::create(state.store(), body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(dept_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Department>, AppError> {
    Ok(Json(DepartmentService::update(state.store(), &dept_id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(dept_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    DepartmentService::delete(state.store(), &dept_id).await?;
    Ok(deleted(Resource::Department))
}
