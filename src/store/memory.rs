//! In-process store. Insertion order stands in for `created_at` ordering.

use super::{Store, StoreError};
use crate::model::{Place, User, UserView};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    places: Vec<Place>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_place_by_id(&self, id: Uuid) -> Result<Option<Place>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.places.iter().find(|p| p.id == id).cloned())
    }

    async fn find_places_by_creator(&self, creator: Uuid) -> Result<Vec<Place>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.places.iter().filter(|p| p.creator == creator).cloned().collect())
    }

    async fn save_place(&self, place: &Place) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == place.creator) {
            return Err(StoreError::UnknownCreator(place.creator));
        }
        match tables.places.iter_mut().find(|p| p.id == place.id) {
            Some(existing) => {
                // creator and created_at are fixed at insert
                existing.title = place.title.clone();
                existing.description = place.description.clone();
                existing.address = place.address.clone();
                existing.location = place.location;
                existing.image = place.image.clone();
                existing.updated_at = place.updated_at;
            }
            None => tables.places.push(place.clone()),
        }
        Ok(())
    }

    async fn update_place(&self, place: &Place) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.places.iter_mut().find(|p| p.id == place.id) {
            Some(existing) => {
                existing.title = place.title.clone();
                existing.description = place.description.clone();
                existing.updated_at = place.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_place(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.places.len();
        tables.places.retain(|p| p.id != id);
        Ok(tables.places.len() < before)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                existing.name = user.name.clone();
                existing.email = user.email.clone();
                existing.password_hash = user.password_hash.clone();
                existing.image = user.image.clone();
            }
            None => tables.users.push(user.clone()),
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserView>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .map(|u| {
                let places = tables.places.iter().filter(|p| p.creator == u.id).count() as u64;
                UserView::from_user(u, places)
            })
            .collect())
    }

    async fn count_places_by_creator(&self, creator: Uuid) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.places.iter().filter(|p| p.creator == creator).count() as u64)
    }
}
