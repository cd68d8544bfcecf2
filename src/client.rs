//! Data-access client with one surface over two transports: HTTP against a running server,
//! or the router driven in-process over any `CollegeStore`.
//!
//! Paths are relative to `/api` (e.g. `/students/search`). Non-2xx responses become
//! [`ClientError::Api`] carrying the server's error code and message.

use crate::error::ErrorBody;
use crate::routes::app;
use crate::state::AppState;
use crate::store::CollegeStore;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceExt;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("api error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("in-process request failed: {0}")]
    InProcess(String),
}

enum Transport {
    Http { client: reqwest::Client, base_url: String },
    InMemory(Router),
}

pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    /// Client for a server at `base_url` (e.g. `http://localhost:3000`).
    pub fn http(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(ApiClient {
            transport: Transport::Http { client, base_url },
        })
    }

    /// Client that serves requests from the full router over `store`, with no network.
    pub fn in_memory(store: Arc<dyn CollegeStore>) -> Self {
        ApiClient {
            transport: Transport::InMemory(app(AppState::new(store))),
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.send(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.send(Method::DELETE, path, &[], None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        match &self.transport {
            Transport::Http { client, base_url } => {
                let url = api_url(base_url, path, query)?;
                tracing::debug!(%method, url = %url, "api request");
                let mut req = client.request(method, url);
                if let Some(b) = body {
                    req = req.json(b);
                }
                let resp = req.send().await?;
                let status = resp.status();
                let bytes = resp.bytes().await?;
                decode(status, &bytes)
            }
            Transport::InMemory(router) => {
                let url = api_url("http://localhost", path, query)?;
                let uri = match url.query() {
                    Some(q) => format!("{}?{}", url.path(), q),
                    None => url.path().to_string(),
                };
                let mut builder = Request::builder().method(method).uri(uri);
                let payload = match body {
                    Some(b) => {
                        builder = builder.header(header::CONTENT_TYPE, "application/json");
                        Body::from(serde_json::to_vec(b)?)
                    }
                    None => Body::empty(),
                };
                let req = builder
                    .body(payload)
                    .map_err(|e| ClientError::InProcess(e.to_string()))?;
                let resp = router
                    .clone()
                    .oneshot(req)
                    .await
                    .map_err(|e| ClientError::InProcess(e.to_string()))?;
                let status = resp.status();
                let bytes = to_bytes(resp.into_body(), usize::MAX)
                    .await
                    .map_err(|e| ClientError::InProcess(e.to_string()))?;
                decode(status, &bytes)
            }
        }
    }
}

fn api_url(base: &str, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Url, ClientError> {
    let raw = format!("{}/api{}", base, path);
    let url = if query.is_empty() {
        reqwest::Url::parse(&raw)
    } else {
        reqwest::Url::parse_with_params(&raw, query)
    };
    url.map_err(|e| ClientError::Url(format!("{}: {}", raw, e)))
}

fn decode(status: StatusCode, bytes: &[u8]) -> Result<Value, ClientError> {
    if status.is_success() {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_slice(bytes)?);
    }
    let (code, message) = match serde_json::from_slice::<ErrorBody>(bytes) {
        Ok(body) => (body.error.code, body.error.message),
        Err(_) => (
            "unknown".to_string(),
            String::from_utf8_lossy(bytes).into_owned(),
        ),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
