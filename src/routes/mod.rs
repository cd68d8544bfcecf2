//! Router assembly: everything under `/api`, JSON 404 fallback, and the middleware stack.

mod common;
mod resources;

pub use common::common_routes;
pub use resources::resource_routes;

use crate::error::{error_response, expose_internal_detail, internal_error_response};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    middleware::map_response_with_state,
    response::Response,
    Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

async fn route_not_found(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("Route {} {} not found", method, uri.path()),
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");
    internal_error_response(detail)
}

async fn internal_errors(State(state): State<AppState>, resp: Response) -> Response {
    if state.expose_internal_errors {
        expose_internal_detail(resp)
    } else {
        resp
    }
}

/// The complete HTTP application.
pub fn app(state: AppState) -> Router {
    let api = common_routes(state.clone()).merge(resource_routes(state.clone()));
    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(map_response_with_state(state, internal_errors))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
