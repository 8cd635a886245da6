//! HTTP handlers for places, users and service status.

pub mod places;
pub mod status;
pub mod users;
pub use places::*;
pub use users::*;

use crate::error::AppError;
use crate::service::body_to_map;
use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

pub const ROUTE_NOT_FOUND: &str = "Could not find this route.";

/// Unreadable or non-object JSON bodies fail validation with `message`.
pub(crate) fn json_object(
    payload: Result<Json<Value>, JsonRejection>,
    message: &'static str,
) -> Result<Map<String, Value>, AppError> {
    let Json(value) = payload.map_err(|rejection| AppError::Validation {
        message,
        fields: vec![rejection.body_text()],
    })?;
    body_to_map(value, message)
}

pub async fn route_not_found() -> AppError {
    AppError::NotFound(ROUTE_NOT_FOUND)
}
