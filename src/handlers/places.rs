//! Place handlers: read by id, list by creator, create, update, delete.

use super::json_object;
use crate::error::AppError;
use crate::model::{NewPlace, PlaceUpdate};
use crate::response::{success_created, success_ok, MessageEnvelope, PlaceEnvelope, PlacesEnvelope};
use crate::service::{text, PlaceService, RequestValidator, CREATE_PLACE_RULES, UPDATE_PLACE_RULES};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

pub const INVALID_PLACE_INPUT: &str = "Invalid data. Please check the inputs.";
pub const PLACE_DELETED: &str = "Place successfully deleted.";

pub async fn get_place_by_id(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let place = PlaceService::find_by_id(&state, &pid).await?;
    Ok(success_ok(PlaceEnvelope { place }))
}

pub async fn get_places_by_user_id(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let places = PlaceService::find_by_creator(&state, &uid).await?;
    Ok(success_ok(PlacesEnvelope { places }))
}

pub async fn create_place(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(payload, INVALID_PLACE_INPUT)?;
    RequestValidator::validate(&body, CREATE_PLACE_RULES, INVALID_PLACE_INPUT)?;
    let creator = Uuid::parse_str(&text(&body, "creator")).map_err(|_| AppError::Validation {
        message: INVALID_PLACE_INPUT,
        fields: vec!["creator must be a valid id".into()],
    })?;
    let input = NewPlace {
        title: text(&body, "title"),
        description: text(&body, "description"),
        address: text(&body, "address"),
        creator,
    };
    let place = PlaceService::create(&state, input).await?;
    Ok(success_created(PlaceEnvelope { place }))
}

/// Only `title` and `description` can change.
pub async fn update_place(
    State(state): State<AppState>,
    Path(pid): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(payload, INVALID_PLACE_INPUT)?;
    RequestValidator::validate(&body, UPDATE_PLACE_RULES, INVALID_PLACE_INPUT)?;
    let changes = PlaceUpdate {
        title: text(&body, "title"),
        description: text(&body, "description"),
    };
    let place = PlaceService::update(&state, &pid, changes).await?;
    Ok(success_ok(PlaceEnvelope { place }))
}

pub async fn delete_place(
    State(state): State<AppState>,
    Path(pid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    PlaceService::delete(&state, &pid).await?;
    Ok(success_ok(MessageEnvelope {
        message: PLACE_DELETED,
        user: None,
    }))
}
