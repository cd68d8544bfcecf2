use super::JsonBody;
use crate::error::AppError;
use crate::model::{Enrollment, Resource};
use crate::response::{created, deleted, MessageBody};
use crate::service::{parse_id, EnrollmentService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Enrollment>>, AppError> {
    Ok(Json(EnrollmentService::list(state.store()).await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Enrollment>, AppError> {
    let id = parse_id(&id, Resource::Enrollment)?;
    Ok(Json(EnrollmentService::get(state.store(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<impl IntoResponse, AppError> {
    Ok(created(EnrollmentService::create(state.store(), body).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let id = parse_id(&id, Resource::Enrollment)?;
    EnrollmentService::delete(state.store(), id).await?;
    Ok(deleted(Resource::Enrollment))
}
