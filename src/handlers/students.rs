use super::{JsonBody, SearchParams};
use crate::error::AppError;
use crate::model::{Resource, Student};
use crate::response::{created, deleted, MessageBody};
use crate::service::{parse_id, StudentService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(StudentService::list(state.store()).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(StudentService::search(state.store(), params.q.as_deref()).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id, Resource::Student)?;
    Ok(Json(StudentService::get(state.store(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    Ok(created(StudentService::create(state.store(), body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Student>, AppError> {
    let id = parse_id(&id, Resource::Student)?;
    Ok(Json(StudentService::update(state.store(), id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id, Resource::Student)?;
    StudentService::delete(state.store(), id).await?;
    Ok(deleted(Resource::Student))
}
