//! Shared application state for all routes.

use crate::geocode::Geocoder;
use crate::store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub geocoder: Arc<dyn Geocoder>,
    /// Image URL assigned to every new place.
    pub default_place_image: String,
    pub default_user_image: String,
}
