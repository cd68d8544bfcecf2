//! HTTP handlers, one module per resource plus the aggregate views.

pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod faculty;
pub mod reports;
pub mod students;

use crate::error::AppError;
use axum::extract::FromRequest;
use serde::Deserialize;

/// `Json` whose rejections answer with the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `?q=` on the search routes.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}
