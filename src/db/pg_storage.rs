// src/db/pg_storage.rs
// DOCUMENTATION: PostgreSQL storage backend - all SQL queries
// PURPOSE: Implement the Storage trait over a connection pool
//
// Schema: states, cities (state_id), users, amenities, places (city_id,
// user_id) and the place_amenity join table. The populate binary
// creates all tables; see src/bin/populate.rs.

use crate::db::storage::{EntityCounts, Storage};
use crate::errors::ApiError;
use crate::models::{Amenity, City, Place, State, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const PLACE_COLUMNS: &str = "id, city_id, user_id, name, description, number_rooms, \
     number_bathrooms, max_guest, price_by_night, latitude, longitude, \
     created_at, updated_at";

/// PostgreSQL implementation of the storage interface
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        PgStorage { pool }
    }

    fn db_err(op: &str, e: sqlx::Error) -> ApiError {
        log::error!("{} failed: {}", op, e);
        ApiError::DatabaseError(e.to_string())
    }

    /// Fill in the amenity id lists for a batch of places
    async fn load_amenities(&self, places: &mut [Place]) -> Result<(), ApiError> {
        if places.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = places.iter().map(|p| p.id).collect();
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT place_id, amenity_id FROM place_amenity \
             WHERE place_id = ANY($1) ORDER BY amenity_id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::db_err("load amenities", e))?;

        let mut by_place: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (place_id, amenity_id) in rows {
            by_place.entry(place_id).or_default().push(amenity_id);
        }

        for place in places.iter_mut() {
            if let Some(linked) = by_place.remove(&place.id) {
                place.amenities = linked;
            }
        }

        Ok(())
    }

    /// Replace the amenity links of a place
    async fn store_amenities(&self, place: &Place) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM place_amenity WHERE place_id = $1")
            .bind(place.id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_err("clear amenity links", e))?;

        for amenity_id in &place.amenities {
            sqlx::query(
                "INSERT INTO place_amenity (place_id, amenity_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(place.id)
            .bind(amenity_id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_err("insert amenity link", e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_state(&self, id: Uuid) -> Result<Option<State>, ApiError> {
        sqlx::query_as::<_, State>(
            "SELECT id, name, created_at, updated_at FROM states WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::db_err("get state", e))
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>, ApiError> {
        sqlx::query_as::<_, City>(
            "SELECT id, state_id, name, created_at, updated_at FROM cities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::db_err("get city", e))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, first_name, last_name, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::db_err("get user", e))
    }

    async fn get_amenity(&self, id: Uuid) -> Result<Option<Amenity>, ApiError> {
        sqlx::query_as::<_, Amenity>(
            "SELECT id, name, created_at, updated_at FROM amenities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::db_err("get amenity", e))
    }

    async fn get_place(&self, id: Uuid) -> Result<Option<Place>, ApiError> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places WHERE id = $1",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::db_err("get place", e))?;

        match place {
            Some(place) => {
                let mut batch = [place];
                self.load_amenities(&mut batch).await?;
                let [place] = batch;
                Ok(Some(place))
            }
            None => Ok(None),
        }
    }

    async fn all_places(&self) -> Result<Vec<Place>, ApiError> {
        let mut places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places ORDER BY created_at, id",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::db_err("list places", e))?;

        self.load_amenities(&mut places).await?;
        Ok(places)
    }

    async fn cities_by_state(&self, state_id: Uuid) -> Result<Vec<City>, ApiError> {
        sqlx::query_as::<_, City>(
            "SELECT id, state_id, name, created_at, updated_at FROM cities \
             WHERE state_id = $1 ORDER BY created_at, id",
        )
        .bind(state_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::db_err("list cities of state", e))
    }

    async fn places_by_city(&self, city_id: Uuid) -> Result<Vec<Place>, ApiError> {
        let mut places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {} FROM places WHERE city_id = $1 ORDER BY created_at, id",
            PLACE_COLUMNS
        ))
        .bind(city_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::db_err("list places of city", e))?;

        self.load_amenities(&mut places).await?;
        Ok(places)
    }

    async fn save_state(&self, state: &State) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO states (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(state.id)
        .bind(&state.name)
        .bind(state.created_at)
        .bind(state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("save state", e))?;
        Ok(())
    }

    async fn save_city(&self, city: &City) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO cities (id, state_id, name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(city.id)
        .bind(city.state_id)
        .bind(&city.name)
        .bind(city.created_at)
        .bind(city.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("save city", e))?;
        Ok(())
    }

    async fn save_user(&self, user: &User) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("save user", e))?;
        Ok(())
    }

    async fn save_amenity(&self, amenity: &Amenity) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO amenities (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(amenity.id)
        .bind(&amenity.name)
        .bind(amenity.created_at)
        .bind(amenity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("save amenity", e))?;
        Ok(())
    }

    async fn save_place(&self, place: &Place) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO places ( \
                id, city_id, user_id, name, description, number_rooms, \
                number_bathrooms, max_guest, price_by_night, latitude, longitude, \
                created_at, updated_at \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(place.id)
        .bind(place.city_id)
        .bind(place.user_id)
        .bind(&place.name)
        .bind(&place.description)
        .bind(place.number_rooms)
        .bind(place.number_bathrooms)
        .bind(place.max_guest)
        .bind(place.price_by_night)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("save place", e))?;

        self.store_amenities(place).await?;

        log::info!("Created place with id: {}", place.id);
        Ok(())
    }

    async fn update_place(&self, place: &Place) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE places \
             SET name = $1, description = $2, number_rooms = $3, number_bathrooms = $4, \
                 max_guest = $5, price_by_night = $6, latitude = $7, longitude = $8, \
                 updated_at = $9 \
             WHERE id = $10",
        )
        .bind(&place.name)
        .bind(&place.description)
        .bind(place.number_rooms)
        .bind(place.number_bathrooms)
        .bind(place.max_guest)
        .bind(place.price_by_night)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(place.updated_at)
        .bind(place.id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::db_err("update place", e))?;

        self.store_amenities(place).await?;

        log::info!("Updated place: {}", place.id);
        Ok(())
    }

    async fn delete_place(&self, id: Uuid) -> Result<bool, ApiError> {
        sqlx::query("DELETE FROM place_amenity WHERE place_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_err("clear amenity links", e))?;

        let rows = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::db_err("delete place", e))?
            .rows_affected();

        if rows > 0 {
            log::info!("Deleted place: {}", id);
        }
        Ok(rows > 0)
    }

    async fn counts(&self) -> Result<EntityCounts, ApiError> {
        let (amenities, cities, places, states, users): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT \
                    (SELECT COUNT(*) FROM amenities), \
                    (SELECT COUNT(*) FROM cities), \
                    (SELECT COUNT(*) FROM places), \
                    (SELECT COUNT(*) FROM states), \
                    (SELECT COUNT(*) FROM users)",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::db_err("count entities", e))?;

        Ok(EntityCounts {
            amenities,
            cities,
            places,
            states,
            users,
        })
    }
}
