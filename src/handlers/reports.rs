//! Dashboard counts and reports.

use crate::error::AppError;
use crate::model::{DashboardStats, Reports};
use crate::service::{DashboardService, ReportService};
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(DashboardService::stats(state.store()).await?))
}

pub async fn reports(State(state): State<AppState>) -> Result<Json<Reports>, AppError> {
    Ok(Json(ReportService::reports(state.store()).await?))
}
