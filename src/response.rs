//! Response envelopes. Each payload is keyed by what it holds (`place`, `places`, `users`, ...).

use crate::model::{Place, UserView};
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct PlaceEnvelope {
    pub place: Place,
}

#[derive(Serialize)]
pub struct PlacesEnvelope {
    pub places: Vec<Place>,
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub user: UserView,
}

#[derive(Serialize)]
pub struct UsersEnvelope {
    pub users: Vec<UserView>,
}

#[derive(Serialize)]
pub struct MessageEnvelope {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

pub fn success_created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}

pub fn success_ok<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(body))
}

/// Health and readiness report. `store` is only set by the readiness check.
#[derive(Serialize)]
pub struct StatusEnvelope {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<&'static str>,
}

#[derive(Serialize)]
pub struct VersionEnvelope {
    pub name: &'static str,
    pub version: &'static str,
}
