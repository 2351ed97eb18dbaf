// src/models/amenity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A feature places can offer (wifi, parking, ...); referenced by many
/// places, owned by none
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Amenity {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
