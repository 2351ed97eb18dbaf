// src/db/storage.rs
// DOCUMENTATION: Storage abstraction consumed by services and handlers
// PURPOSE: Decouple request handling from the persistence backend

use crate::errors::ApiError;
use crate::models::{Amenity, City, Place, State, User};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle injected into handlers as application state
pub type SharedStorage = Arc<dyn Storage>;

/// Per-type entity totals for GET /stats
#[derive(Debug, Default, Clone, Serialize)]
pub struct EntityCounts {
    pub amenities: i64,
    pub cities: i64,
    pub places: i64,
    pub states: i64,
    pub users: i64,
}

/// Persistence interface for the listing domain.
///
/// Lookups return `Ok(None)` for absent ids; only backend failures are
/// errors. Collection methods (`all_places`, `cities_by_state`,
/// `places_by_city`) list entities in creation order, ties broken by
/// id - search output ordering depends on this contract.
///
/// # Implementations
///
/// - [`crate::db::PgStorage`] - PostgreSQL backend
/// - [`crate::db::MemoryStorage`] - in-memory backend (tests, development)
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_state(&self, id: Uuid) -> Result<Option<State>, ApiError>;

    async fn get_city(&self, id: Uuid) -> Result<Option<City>, ApiError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, ApiError>;

    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, ApiError>;

    /// Every stored place, creation order
    async fn all_places(&self) -> Result<Vec<Place>, ApiError>;

    /// Cities owned by a state, creation order; empty for unknown states
    async fn cities_by_state(&self, state_id: Uuid) -> Result<Vec<City>, ApiError>;

    /// Places owned by a city, creation order; empty for unknown cities
    async fn places_by_city(&self, city_id: Uuid) -> Result<Vec<Place>, ApiError>;

    async fn save_state(&self, state: &State) -> Result<(), ApiError>;

    async fn save_city(&self, city: &City) -> Result<(), ApiError>;

    async fn save_user(&self, user: &User) -> Result<(), ApiError>;

    async fn save_amenity(&self, amenity: &Amenity) -> Result<(), ApiError>;

    async fn save_place(&self, place: &Place) -> Result<(), ApiError>;

    /// Persist changed mutable fields (and amenity links) of a place
    async fn update_place(&self, place: &Place) -> Result<(), ApiError>;

    /// Remove a place; returns false when no such place exists
    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn counts(&self) -> Result<EntityCounts, ApiError>;
}
