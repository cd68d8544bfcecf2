//! Success response helpers. Reads and updates answer 200 with the bare row or array,
//! creates answer 201, deletes answer `{message}`.

use crate::model::Resource;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn deleted(resource: Resource) -> Json<MessageBody> {
    Json(MessageBody {
        message: resource.deleted_message(),
    })
}
