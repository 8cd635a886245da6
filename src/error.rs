//! Typed errors and HTTP mapping.

use crate::geocode::GeocodeError;
use crate::security::PasswordError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown storage backend '{0}' (expected postgres or memory)")]
    UnknownStorage(String),
    #[error("invalid schema name '{0}'")]
    InvalidSchema(String),
}

/// Errors returned by handlers. The `Display` text is what the client sees.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{message}")]
    Validation {
        message: &'static str,
        fields: Vec<String>,
    },
    #[error("{0}")]
    Unprocessable(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Fixed client message; `source` is logged and never serialized.
    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: InternalSource,
    },
}

#[derive(Error, Debug)]
pub enum InternalSource {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AppError {
    pub fn internal(message: &'static str, source: impl Into<InternalSource>) -> Self {
        AppError::Internal {
            message,
            source: source.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Internal { source, .. } => {
                tracing::error!(error = %source, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        let details = match &self {
            AppError::Validation { fields, .. } => Some(fields.clone()),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            code,
            details,
        };
        (status, Json(body)).into_response()
    }
}
