//! Domain records: places, users, and the public user projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Location,
    pub image: String,
    /// Id of the user who created the place.
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored account. Holds the password hash, so it is never serialized; see [`UserView`].
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Always lower-cased.
    pub email: String,
    pub password_hash: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    /// Number of places created by this user.
    pub places: u64,
    pub created_at: DateTime<Utc>,
}

impl UserView {
    pub fn from_user(user: &User, places: u64) -> Self {
        UserView {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            places,
            created_at: user.created_at,
        }
    }
}

/// Validated input for creating a place.
#[derive(Clone, Debug)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub creator: Uuid,
}

#[derive(Clone, Debug)]
pub struct PlaceUpdate {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
