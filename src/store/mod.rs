//! Persistence for places and users behind the [`Store`] trait.
//!
//! [`PgStore`] is the PostgreSQL backend; [`MemoryStore`] keeps everything in process
//! and backs tests and `STORAGE=memory` runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

use crate::model::{Place, User, UserView};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("unknown creator: {0}")]
    UnknownCreator(Uuid),
    #[error("invalid DATABASE_URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness probe used by the readiness route.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_place_by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError>;

    /// Places created by `creator`, oldest first.
    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError>;

    /// Insert or overwrite the place with `place.id`.
    async fn save_place(&self, place: &Place) -> Result<(), StoreError>;

    /// Write `title`, `description` and `updated_at` of an existing place.
    /// Returns false when no place had that id; never inserts.
    async fn update_place(&self, place: &Place) -> Result<bool, StoreError>;

    /// Returns false when no place had that id.
    async fn remove_place(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// `email` must already be lower-cased.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert or overwrite the user with `user.id`. Fails with
    /// [`StoreError::DuplicateEmail`] when another user owns the email.
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// All users with their place counts, oldest account first.
    async fn list_users(&self) -> Result<Vec<UserView>, StoreError>;

    async fn count_places_by_creator(&self, creator: Uuid) -> Result<u64, StoreError>;
}
