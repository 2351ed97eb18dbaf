// src/models/city.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A city inside a state; sole owner of its places
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: Uuid,
    /// Owning state (one-to-many, set at creation)
    pub state_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub fn new(state_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        City {
            id: Uuid::new_v4(),
            state_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
