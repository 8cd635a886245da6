//! Place lookups and mutations with their client-facing failure messages.

use crate::error::AppError;
use crate::geocode::GeocodeError;
use crate::model::{NewPlace, Place, PlaceUpdate};
use crate::state::AppState;
use crate::store::StoreError;
use chrono::Utc;
use uuid::Uuid;

pub const PLACE_NOT_FOUND: &str = "Could not find a place for the provided ID.";
pub const PLACES_NOT_FOUND: &str = "Could not find places for the provided user ID.";
pub const CREATOR_NOT_FOUND: &str = "Could not find user for the provided ID.";
pub const LOCATION_NOT_FOUND: &str = "Could not find location for the specified address.";
pub const FIND_FAILED: &str = "Something went wrong, could not find any place.";
pub const CREATE_FAILED: &str = "Creating place failed, please try again.";
pub const UPDATE_FAILED: &str = "Something went wrong, could not update the place.";
pub const DELETE_FAILED: &str = "Something went wrong, could not delete the place.";

/// Malformed ids can never match a stored record, so they are a lookup miss.
pub(crate) fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}

pub struct PlaceService;

impl PlaceService {
    pub async fn find_by_id(state: &AppState, id: &str) -> Result<Place, AppError> {
        let id = parse_id(id).ok_or(AppError::NotFound(PLACE_NOT_FOUND))?;
        state
            .store
            .find_place_by_id(id)
            .await
            .map_err(|e| AppError::internal(FIND_FAILED, e))?
            .ok_or(AppError::NotFound(PLACE_NOT_FOUND))
    }

    /// Fails with 404 when the user has no places, including unknown users.
    pub async fn find_by_creator(state: &AppState, creator: &str) -> Result<Vec<Place>, AppError> {
        let creator = parse_id(creator).ok_or(AppError::NotFound(PLACES_NOT_FOUND))?;
        let places = state
            .store
            .find_places_by_creator(creator)
            .await
            .map_err(|e| AppError::internal(FIND_FAILED, e))?;
        if places.is_empty() {
            return Err(AppError::NotFound(PLACES_NOT_FOUND));
        }
        Ok(places)
    }

    pub async fn create(state: &AppState, input: NewPlace) -> Result<Place, AppError> {
        let creator = state
            .store
            .find_user_by_id(input.creator)
            .await
            .map_err(|e| AppError::internal(CREATE_FAILED, e))?;
        if creator.is_none() {
            return Err(AppError::NotFound(CREATOR_NOT_FOUND));
        }

        let location = state.geocoder.coordinates(&input.address).await.map_err(|e| match e {
            GeocodeError::NotFound => AppError::Unprocessable(LOCATION_NOT_FOUND),
            other => AppError::internal(CREATE_FAILED, other),
        })?;

        let now = Utc::now();
        let place = Place {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            address: input.address,
            location,
            image: state.default_place_image.clone(),
            creator: input.creator,
            created_at: now,
            updated_at: now,
        };
        state.store.save_place(&place).await.map_err(|e| match e {
            StoreError::UnknownCreator(_) => AppError::NotFound(CREATOR_NOT_FOUND),
            other => AppError::internal(CREATE_FAILED, other),
        })?;
        tracing::info!(place_id = %place.id, creator = %place.creator, "place created");
        Ok(place)
    }

    pub async fn update(state: &AppState, id: &str, changes: PlaceUpdate) -> Result<Place, AppError> {
        let mut place = Self::find_by_id(state, id).await?;
        place.title = changes.title;
        place.description = changes.description;
        place.updated_at = Utc::now();
        let updated = state
            .store
            .update_place(&place)
            .await
            .map_err(|e| AppError::internal(UPDATE_FAILED, e))?;
        if !updated {
            // removed between the lookup and the write
            return Err(AppError::NotFound(PLACE_NOT_FOUND));
        }
        tracing::info!(place_id = %place.id, "place updated");
        Ok(place)
    }

    pub async fn delete(state: &AppState, id: &str) -> Result<(), AppError> {
        let id = parse_id(id).ok_or(AppError::NotFound(PLACE_NOT_FOUND))?;
        let removed = state
            .store
            .remove_place(id)
            .await
            .map_err(|e| AppError::internal(DELETE_FAILED, e))?;
        if !removed {
            return Err(AppError::NotFound(PLACE_NOT_FOUND));
        }
        tracing::info!(place_id = %id, "place deleted");
        Ok(())
    }
}
