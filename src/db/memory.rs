// src/db/memory.rs
// DOCUMENTATION: In-memory storage backend
// PURPOSE: Backend for tests and STORAGE_BACKEND=memory development runs

use crate::db::storage::{EntityCounts, Storage};
use crate::errors::ApiError;
use crate::models::{Amenity, City, Place, State, User};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    states: Vec<State>,
    cities: Vec<City>,
    users: Vec<User>,
    amenities: Vec<Amenity>,
    places: Vec<Place>,
}

/// Thread-safe in-memory store
/// DOCUMENTATION: Vec-backed so collection methods naturally list in
/// insertion order, which doubles as creation order here
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_state(&self, id: Uuid) -> Result<Option<State>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.states.iter().find(|s| s.id == id).cloned())
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.cities.iter().find(|c| c.id == id).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.amenities.iter().find(|a| a.id == id).cloned())
    }

    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.places.iter().find(|p| p.id == id).cloned())
    }

    async fn all_places(&self) -> Result<Vec<Place>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner.places.clone())
    }

    async fn cities_by_state(&self, state_id: Uuid) -> Result<Vec<City>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner
            .cities
            .iter()
            .filter(|c| c.state_id == state_id)
            .cloned()
            .collect())
    }

    async fn places_by_city(&self, city_id: Uuid) -> Result<Vec<Place>, ApiError> {
        let inner = self.inner.read().await;
        Ok(inner
            .places
            .iter()
            .filter(|p| p.city_id == city_id)
            .cloned()
            .collect())
    }

    async fn save_state(&self, state: &State) -> Result<(), ApiError> {
        self.inner.write().await.states.push(state.clone());
        Ok(())
    }

    async fn save_city(&self, city: &City) -> Result<(), ApiError> {
        self.inner.write().await.cities.push(city.clone());
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), ApiError> {
        self.inner.write().await.users.push(user.clone());
        Ok(())
    }

    async fn save_amenity(&self, amenity: &Amenity) -> Result<(), ApiError> {
        self.inner.write().await.amenities.push(amenity.clone());
        Ok(())
    }

    async fn save_place(&self, place: &Place) -> Result<(), ApiError> {
        self.inner.write().await.places.push(place.clone());
        Ok(())
    }

    async fn update_place(&self, place: &Place) -> Result<(), ApiError> {
        let mut inner = self.inner.write().await;
        if let Some(slot) = inner.places.iter_mut().find(|p| p.id == place.id) {
            // Replace in position so listing order is unaffected
            *slot = place.clone();
        }
        Ok(())
    }

    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.write().await;
        match inner.places.iter().position(|p| p.id == id) {
            Some(index) => {
                inner.places.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn counts(&self) -> Result<EntityCounts, ApiError> {
        let inner = self.inner.read().await;
        Ok(EntityCounts {
            amenities: inner.amenities.len() as i64,
            cities: inner.cities.len() as i64,
            places: inner.places.len() as i64,
            states: inner.states.len() as i64,
            users: inner.users.len() as i64,
        })
    }
}
