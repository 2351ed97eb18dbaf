// src/services/place_service.rs
// DOCUMENTATION: Business logic for place CRUD
// PURPOSE: Intermediary between handlers and storage, owns the check order

use crate::db::Storage;
use crate::errors::ApiError;
use crate::models::{CreatePlaceRequest, Place, UpdatePlaceRequest};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

pub struct PlaceService;

impl PlaceService {
    /// All places of a city, rendered as field maps
    pub async fn list_by_city(
        storage: &dyn Storage,
        city_id: Uuid,
    ) -> Result<Vec<Map<String, Value>>, ApiError> {
        let city = storage
            .get_city(city_id)
            .await?
            .ok_or_else(|| ApiError::not_found("City", city_id))?;

        let places = storage.places_by_city(city.id).await?;
        Ok(places.iter().map(Place::to_map).collect())
    }

    pub async fn get_place(
        storage: &dyn Storage,
        place_id: Uuid,
    ) -> Result<Map<String, Value>, ApiError> {
        let place = storage
            .get_place(place_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Place", place_id))?;

        Ok(place.to_map())
    }

    /// Create a place under a city
    ///
    /// Check order is part of the interface contract: missing city
    /// (404) before body problems (400), missing user_id before the
    /// user lookup (404), missing name last.
    pub async fn create_place(
        storage: &dyn Storage,
        city_id: Uuid,
        body: Option<CreatePlaceRequest>,
    ) -> Result<Map<String, Value>, ApiError> {
        let city = storage
            .get_city(city_id)
            .await?
            .ok_or_else(|| ApiError::not_found("City", city_id))?;

        let req = body.ok_or_else(|| ApiError::InvalidInput("Not a JSON".to_string()))?;

        let user_id = req
            .user_id
            .ok_or_else(|| ApiError::InvalidInput("Missing user_id".to_string()))?;
        let user = storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id))?;

        let name = req
            .name
            .clone()
            .ok_or_else(|| ApiError::InvalidInput("Missing name".to_string()))?;

        if let Err(e) = req.validate() {
            return Err(ApiError::ValidationError(e.to_string()));
        }

        let place = req.build(city.id, user.id, name);
        storage.save_place(&place).await?;

        log::info!("Created place {} in city {}", place.id, city.id);
        Ok(place.to_map())
    }

    /// Partial update; protected fields in the body are ignored
    pub async fn update_place(
        storage: &dyn Storage,
        place_id: Uuid,
        body: Option<UpdatePlaceRequest>,
    ) -> Result<Map<String, Value>, ApiError> {
        let mut place = storage
            .get_place(place_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Place", place_id))?;

        let req = body.ok_or_else(|| ApiError::InvalidInput("Not a JSON".to_string()))?;

        place.apply_update(&req);
        storage.update_place(&place).await?;

        log::info!("Updated place {}", place.id);
        Ok(place.to_map())
    }

    pub async fn delete_place(storage: &dyn Storage, place_id: Uuid) -> Result<(), ApiError> {
        if !storage.delete_place(place_id).await? {
            return Err(ApiError::not_found("Place", place_id));
        }
        Ok(())
    }
}
