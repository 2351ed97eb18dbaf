// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines all serialization/deserialization models for API and storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a complete place record
/// DOCUMENTATION: Maps directly to the places table in PostgreSQL; the
/// amenities column is assembled from the place_amenity join table
///
/// Ownership invariant: a place belongs to exactly one city and one
/// user, fixed at creation. id, city_id, user_id and created_at are
/// never changed through the HTTP interface; updated_at is maintained
/// by apply_update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Place {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Owning city (set from the creation route, immutable)
    pub city_id: Uuid,

    /// Owning user (set from the creation body, immutable)
    pub user_id: Uuid,

    /// Listing name - required field for all places
    pub name: String,

    /// Optional detailed description
    pub description: Option<String>,

    /// Number of rooms
    pub number_rooms: i32,

    /// Number of bathrooms
    pub number_bathrooms: i32,

    /// Guest capacity
    pub max_guest: i32,

    /// Nightly price
    pub price_by_night: i32,

    /// Geographic coordinates
    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Linked amenity ids (many-to-many, no ownership)
    #[sqlx(skip)]
    pub amenities: Vec<Uuid>,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Constrained constructor: identity, ownership and timestamps are
    /// fixed here and only here
    pub fn new(city_id: Uuid, user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Place {
            id: Uuid::new_v4(),
            city_id,
            user_id,
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update
    /// DOCUMENTATION: Only the documented mutable fields are written;
    /// the protected keys carried by UpdatePlaceRequest never reach the
    /// record. Bumps updated_at.
    pub fn apply_update(&mut self, req: &UpdatePlaceRequest) {
        if let Some(name) = &req.name {
            self.name = name.clone();
        }
        if let Some(description) = &req.description {
            self.description = Some(description.clone());
        }
        if let Some(number_rooms) = req.number_rooms {
            self.number_rooms = number_rooms;
        }
        if let Some(number_bathrooms) = req.number_bathrooms {
            self.number_bathrooms = number_bathrooms;
        }
        if let Some(max_guest) = req.max_guest {
            self.max_guest = max_guest;
        }
        if let Some(price_by_night) = req.price_by_night {
            self.price_by_night = price_by_night;
        }
        if let Some(latitude) = req.latitude {
            self.latitude = Some(latitude);
        }
        if let Some(longitude) = req.longitude {
            self.longitude = Some(longitude);
        }
        if let Some(amenities) = &req.amenities {
            self.amenities = amenities.clone();
        }
        self.updated_at = Utc::now();
    }

    /// Render the place as a plain field map
    /// DOCUMENTATION: Used for every response body; the search endpoint
    /// additionally strips the amenities key from this map
    pub fn to_map(&self) -> Map<String, Value> {
        if let Ok(Value::Object(map)) = serde_json::to_value(self) {
            map
        } else {
            Map::new()
        }
    }
}

/// Request DTO for creating a new place
/// DOCUMENTATION: Data transfer object for POST /cities/{city_id}/places
///
/// user_id and name are required but modeled as Option so the handler
/// can report which one is missing. Protected keys (id, city_id,
/// timestamps) are accepted on the wire and ignored - the server
/// generates identity and the route fixes the owning city. Anything
/// else is rejected as an invalid body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePlaceRequest {
    /// Owning user (required)
    pub user_id: Option<Uuid>,

    /// Listing name (required)
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0))]
    pub price_by_night: Option<i32>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Initial amenity links
    #[serde(default)]
    pub amenities: Vec<Uuid>,

    // Ignored protected keys
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub city_id: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub created_at: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub updated_at: Option<Value>,
}

impl CreatePlaceRequest {
    /// Build the place once the required fields have been checked
    pub fn build(&self, city_id: Uuid, user_id: Uuid, name: String) -> Place {
        let mut place = Place::new(city_id, user_id, name);
        place.description = self.description.clone();
        place.number_rooms = self.number_rooms.unwrap_or(0);
        place.number_bathrooms = self.number_bathrooms.unwrap_or(0);
        place.max_guest = self.max_guest.unwrap_or(0);
        place.price_by_night = self.price_by_night.unwrap_or(0);
        place.latitude = self.latitude;
        place.longitude = self.longitude;
        place.amenities = self.amenities.clone();
        place
    }
}

/// Request DTO for updating an existing place
/// DOCUMENTATION: Data transfer object for PUT /places/{place_id}
/// All mutable fields are optional - only provided fields are updated.
/// Protected keys are accepted and ignored; unknown keys fail
/// deserialization and surface as a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_rooms: Option<i32>,
    pub number_bathrooms: Option<i32>,
    pub max_guest: Option<i32>,
    pub price_by_night: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amenities: Option<Vec<Uuid>>,

    // Ignored protected keys
    #[serde(default)]
    #[allow(dead_code)]
    pub id: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub user_id: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub city_id: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub created_at: Option<Value>,
    #[serde(default)]
    #[allow(dead_code)]
    pub updated_at: Option<Value>,
}

/// Search criteria for POST /places/places_search
/// DOCUMENTATION: Ids arrive as strings; values that do not parse as
/// UUIDs or do not resolve to stored entities contribute nothing
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub states: Vec<String>,

    #[serde(default)]
    pub cities: Vec<String>,

    #[serde(default)]
    pub amenities: Vec<String>,
}

impl SearchCriteria {
    /// True when no filter field carries any id
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty() && self.amenities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_place_gets_fresh_identity() {
        let city = Uuid::new_v4();
        let user = Uuid::new_v4();
        let a = Place::new(city, user, "Loft");
        let b = Place::new(city, user, "Loft");

        assert_ne!(a.id, b.id);
        assert_eq!(a.city_id, city);
        assert_eq!(a.user_id, user);
        assert!(a.amenities.is_empty());
    }

    #[test]
    fn to_map_exposes_all_columns() {
        let place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Cabin");
        let map = place.to_map();

        assert_eq!(map["name"], json!("Cabin"));
        assert!(map.contains_key("id"));
        assert!(map.contains_key("city_id"));
        assert!(map.contains_key("user_id"));
        assert!(map.contains_key("amenities"));
        assert!(map.contains_key("created_at"));
        assert!(map.contains_key("updated_at"));
    }

    #[test]
    fn update_request_tolerates_protected_keys() {
        let req: UpdatePlaceRequest = serde_json::from_value(json!({
            "id": "not-applied",
            "user_id": "not-applied",
            "created_at": "2017-01-01T00:00:00Z",
            "name": "Renamed"
        }))
        .expect("protected keys must deserialize");

        assert_eq!(req.name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn update_request_rejects_unknown_keys() {
        let res = serde_json::from_value::<UpdatePlaceRequest>(json!({
            "name": "x",
            "swimming_pool": true
        }));

        assert!(res.is_err());
    }

    #[test]
    fn apply_update_only_touches_mutable_fields() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Old");
        let id = place.id;
        let created = place.created_at;

        let req: UpdatePlaceRequest = serde_json::from_value(json!({
            "id": "ffffffff-ffff-ffff-ffff-ffffffffffff",
            "name": "New",
            "price_by_night": 120
        }))
        .expect("valid update body");
        place.apply_update(&req);

        assert_eq!(place.id, id);
        assert_eq!(place.created_at, created);
        assert_eq!(place.name, "New");
        assert_eq!(place.price_by_night, 120);
        assert!(place.updated_at >= created);
    }

    #[test]
    fn empty_criteria_detection() {
        let empty: SearchCriteria = serde_json::from_value(json!({})).expect("empty object");
        assert!(empty.is_empty());

        let with_state: SearchCriteria =
            serde_json::from_value(json!({ "states": ["abc"] })).expect("states list");
        assert!(!with_state.is_empty());
    }
}
