use super::{JsonBody, SearchParams};
use crate::error::AppError;
use crate::model::{Course, Resource};
use crate::response::{created, deleted, MessageBody};
use crate::service::{parse_id, CourseService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(CourseService::list(state.store()).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(CourseService::search(state.store(), params.q.as_deref()).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let id = parse_id(&id, Resource::Course)?;
    Ok(Json(CourseService::get(state.store(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    Ok(created(CourseService::create(state.store(), body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Course>, AppError> {
    let id = parse_id(&id, Resource::Course)?;
    Ok(Json(CourseService::update(state.store(), id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id, Resource::Course)?;
    CourseService::delete(state.store(), id).await?;
    Ok(deleted(Resource::Course))
}

/// POST /courses/assign
pub async fn assign(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(CourseService::assign_faculty(state.store(), body).await?))
}
