//! Liveness, readiness and build info.

use crate::response::{success_ok, StatusEnvelope, VersionEnvelope};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

pub async fn health() -> impl IntoResponse {
    success_ok(StatusEnvelope {
        status: "ok",
        store: None,
    })
}

/// 503 while the store does not answer a ping.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => success_ok(StatusEnvelope {
            status: "ok",
            store: Some("ok"),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusEnvelope {
                    status: "degraded",
                    store: Some("unavailable"),
                }),
            )
        }
    }
}

pub async fn version() -> impl IntoResponse {
    success_ok(VersionEnvelope {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
