use super::{JsonBody, SearchParams};
use crate::error::AppError;
use crate::model::{Faculty, Resource};
use crate::response::{created, deleted, MessageBody};
use crate::service::{parse_id, FacultyService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Faculty>>, AppError> {
    Ok(Json(FacultyService::list(state.store()).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Faculty>>, AppError> {
    Ok(Json(FacultyService::search(state.store(), params.q.as_deref()).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Faculty>, AppError> {
    let id = parse_id(&id, Resource::Faculty)?;
    Ok(Json(FacultyService::get(state.store(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    Ok(created(FacultyService::create(state.store(), body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Faculty>, AppError> {
    let id = parse_id(&id, Resource::Faculty)?;
    Ok(Json(FacultyService::update(state.store(), id, body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id, Resource::Faculty)?;
    FacultyService::delete(state.store(), id).await?;
    Ok(deleted(Resource::Faculty))
}
