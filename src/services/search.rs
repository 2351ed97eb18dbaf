// src/services/search.rs
// DOCUMENTATION: Multi-criteria place search
// PURPOSE: Resolve state/city/amenity criteria into an ordered place list

use crate::db::Storage;
use crate::errors::ApiError;
use crate::models::{Amenity, City, Place, SearchCriteria, State};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

pub struct SearchService;

impl SearchService {
    /// Run the search and render the matches.
    ///
    /// Stages, in order:
    /// 1. No criteria at all: every stored place.
    /// 2. State ids: every place of every city of each resolvable
    ///    state. Contributions are appended as traversed; listing the
    ///    same state twice contributes its places twice.
    /// 3. City ids: places of each resolvable city, skipping any place
    ///    already collected.
    /// 4. Amenity ids: retention pass requiring every resolvable
    ///    requested amenity (conjunction). When the previous stages
    ///    collected nothing - whether their filters were omitted or
    ///    simply matched no entity - the pass starts from the full
    ///    place set instead.
    ///
    /// Ids that do not parse or do not resolve contribute nothing.
    /// Read-only: storage is never written.
    pub async fn search(
        storage: &dyn Storage,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Value>, ApiError> {
        if criteria.is_empty() {
            let places = storage.all_places().await?;
            return Ok(render(places));
        }

        let mut selected: Vec<Place> = Vec::new();

        for raw_id in &criteria.states {
            if let Some(state) = resolve_state(storage, raw_id).await? {
                for city in storage.cities_by_state(state.id).await? {
                    let places = storage.places_by_city(city.id).await?;
                    selected.extend(places);
                }
            }
        }

        if !criteria.cities.is_empty() {
            let mut seen: HashSet<Uuid> = selected.iter().map(|p| p.id).collect();
            for raw_id in &criteria.cities {
                if let Some(city) = resolve_city(storage, raw_id).await? {
                    for place in storage.places_by_city(city.id).await? {
                        if seen.insert(place.id) {
                            selected.push(place);
                        }
                    }
                }
            }
        }

        if !criteria.amenities.is_empty() {
            if selected.is_empty() {
                selected = storage.all_places().await?;
            }

            let mut required: Vec<Uuid> = Vec::new();
            for raw_id in &criteria.amenities {
                if let Some(amenity) = resolve_amenity(storage, raw_id).await? {
                    required.push(amenity.id);
                }
            }

            selected.retain(|place| required.iter().all(|a| place.amenities.contains(a)));
        }

        log::debug!(
            "Search matched {} places (states: {}, cities: {}, amenities: {})",
            selected.len(),
            criteria.states.len(),
            criteria.cities.len(),
            criteria.amenities.len()
        );

        Ok(render(selected))
    }
}

/// Serialize places to field maps, without the amenities key
fn render(places: Vec<Place>) -> Vec<Value> {
    places
        .iter()
        .map(|place| {
            let mut map = place.to_map();
            map.remove("amenities");
            Value::Object(map)
        })
        .collect()
}

async fn resolve_state(storage: &dyn Storage, raw: &str) -> Result<Option<State>, ApiError> {
    match Uuid::parse_str(raw) {
        Ok(id) => storage.get_state(id).await,
        Err(_) => Ok(None),
    }
}

async fn resolve_city(storage: &dyn Storage, raw: &str) -> Result<Option<City>, ApiError> {
    match Uuid::parse_str(raw) {
        Ok(id) => storage.get_city(id).await,
        Err(_) => Ok(None),
    }
}

async fn resolve_amenity(storage: &dyn Storage, raw: &str) -> Result<Option<Amenity>, ApiError> {
    match Uuid::parse_str(raw) {
        Ok(id) => storage.get_amenity(id).await,
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::User;
    use serde_json::json;

    async fn state(storage: &MemoryStorage, name: &str) -> State {
        let state = State::new(name);
        storage.save_state(&state).await.unwrap();
        state
    }

    async fn city(storage: &MemoryStorage, state: &State, name: &str) -> City {
        let city = City::new(state.id, name);
        storage.save_city(&city).await.unwrap();
        city
    }

    async fn amenity(storage: &MemoryStorage, name: &str) -> Amenity {
        let amenity = Amenity::new(name);
        storage.save_amenity(&amenity).await.unwrap();
        amenity
    }

    async fn place(
        storage: &MemoryStorage,
        city: &City,
        user: &User,
        name: &str,
        amenities: &[&Amenity],
    ) -> Place {
        let mut place = Place::new(city.id, user.id, name);
        place.amenities = amenities.iter().map(|a| a.id).collect();
        storage.save_place(&place).await.unwrap();
        place
    }

    fn criteria(states: &[Uuid], cities: &[Uuid], amenities: &[Uuid]) -> SearchCriteria {
        SearchCriteria {
            states: states.iter().map(Uuid::to_string).collect(),
            cities: cities.iter().map(Uuid::to_string).collect(),
            amenities: amenities.iter().map(Uuid::to_string).collect(),
        }
    }

    fn names(results: &[Value]) -> Vec<String> {
        results
            .iter()
            .map(|v| v["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// One user, one state with one city and two places, in order
    async fn small_world(storage: &MemoryStorage) -> (State, City, Place, Place, User) {
        let user = User::new("host@example.com");
        storage.save_user(&user).await.unwrap();
        let s1 = state(storage, "Oregon").await;
        let c1 = city(storage, &s1, "Portland").await;
        let p1 = place(storage, &c1, &user, "P1", &[]).await;
        let p2 = place(storage, &c1, &user, "P2", &[]).await;
        (s1, c1, p1, p2, user)
    }

    #[tokio::test]
    async fn empty_criteria_returns_everything_in_order() {
        let storage = MemoryStorage::new();
        small_world(&storage).await;

        let results = SearchService::search(&storage, &SearchCriteria::default())
            .await
            .unwrap();

        assert_eq!(names(&results), ["P1", "P2"]);
    }

    #[tokio::test]
    async fn state_filter_traverses_cities_in_order() {
        let storage = MemoryStorage::new();
        let (s1, _, _, _, _) = small_world(&storage).await;

        let results = SearchService::search(&storage, &criteria(&[s1.id], &[], &[]))
            .await
            .unwrap();

        assert_eq!(names(&results), ["P1", "P2"]);
    }

    #[tokio::test]
    async fn unresolvable_state_ids_contribute_nothing() {
        let storage = MemoryStorage::new();
        let (s1, _, _, _, _) = small_world(&storage).await;

        let mut crit = criteria(&[Uuid::new_v4(), s1.id], &[], &[]);
        crit.states.push("not-a-uuid".to_string());
        let results = SearchService::search(&storage, &crit).await.unwrap();

        assert_eq!(names(&results), ["P1", "P2"]);
    }

    #[tokio::test]
    async fn repeated_state_id_is_not_deduplicated() {
        let storage = MemoryStorage::new();
        let (s1, _, _, _, _) = small_world(&storage).await;

        let results = SearchService::search(&storage, &criteria(&[s1.id, s1.id], &[], &[]))
            .await
            .unwrap();

        assert_eq!(names(&results), ["P1", "P2", "P1", "P2"]);
    }

    #[tokio::test]
    async fn city_stage_appends_only_unseen_places() {
        let storage = MemoryStorage::new();
        let (s1, c1, _, _, user) = small_world(&storage).await;
        let s2 = state(&storage, "Washington").await;
        let c2 = city(&storage, &s2, "Seattle").await;
        place(&storage, &c2, &user, "P3", &[]).await;

        // c1's places arrive through the state stage; listing c1 again
        // adds nothing, listing c2 appends after them
        let results = SearchService::search(&storage, &criteria(&[s1.id], &[c1.id, c2.id], &[]))
            .await
            .unwrap();

        assert_eq!(names(&results), ["P1", "P2", "P3"]);
    }

    #[tokio::test]
    async fn repeated_city_id_is_deduplicated() {
        let storage = MemoryStorage::new();
        let (_, c1, _, _, _) = small_world(&storage).await;

        let results = SearchService::search(&storage, &criteria(&[], &[c1.id, c1.id], &[]))
            .await
            .unwrap();

        assert_eq!(names(&results), ["P1", "P2"]);
    }

    #[tokio::test]
    async fn amenity_filter_requires_every_requested_amenity() {
        let storage = MemoryStorage::new();
        let user = User::new("host@example.com");
        storage.save_user(&user).await.unwrap();
        let s1 = state(&storage, "Oregon").await;
        let c1 = city(&storage, &s1, "Portland").await;
        let wifi = amenity(&storage, "Wifi").await;
        let kitchen = amenity(&storage, "Kitchen").await;
        place(&storage, &c1, &user, "BothAmenities", &[&wifi, &kitchen]).await;
        place(&storage, &c1, &user, "WifiOnly", &[&wifi]).await;
        place(&storage, &c1, &user, "Bare", &[]).await;

        let results =
            SearchService::search(&storage, &criteria(&[], &[], &[wifi.id, kitchen.id]))
                .await
                .unwrap();

        assert_eq!(names(&results), ["BothAmenities"]);
        // The amenities key is stripped from search output
        assert!(results[0].get("amenities").is_none());
    }

    #[tokio::test]
    async fn amenity_filter_with_no_match_yields_empty() {
        let storage = MemoryStorage::new();
        small_world(&storage).await;
        let sauna = amenity(&storage, "Sauna").await;

        let results = SearchService::search(&storage, &criteria(&[], &[], &[sauna.id]))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn amenity_stage_falls_back_when_city_stage_resolved_nothing() {
        let storage = MemoryStorage::new();
        let user = User::new("host@example.com");
        storage.save_user(&user).await.unwrap();
        let s1 = state(&storage, "Oregon").await;
        let c1 = city(&storage, &s1, "Portland").await;
        let wifi = amenity(&storage, "Wifi").await;
        place(&storage, &c1, &user, "WithWifi", &[&wifi]).await;
        place(&storage, &c1, &user, "Bare", &[]).await;

        // The city filter was applied but resolved no entity; the
        // amenity pass starts from the full set regardless
        let results = SearchService::search(&storage, &criteria(&[], &[Uuid::new_v4()], &[wifi.id]))
            .await
            .unwrap();

        assert_eq!(names(&results), ["WithWifi"]);
    }

    #[tokio::test]
    async fn unresolvable_amenity_ids_are_skipped() {
        let storage = MemoryStorage::new();
        let user = User::new("host@example.com");
        storage.save_user(&user).await.unwrap();
        let s1 = state(&storage, "Oregon").await;
        let c1 = city(&storage, &s1, "Portland").await;
        let wifi = amenity(&storage, "Wifi").await;
        place(&storage, &c1, &user, "WithWifi", &[&wifi]).await;
        place(&storage, &c1, &user, "Bare", &[]).await;

        let results =
            SearchService::search(&storage, &criteria(&[], &[], &[Uuid::new_v4(), wifi.id]))
                .await
                .unwrap();

        assert_eq!(names(&results), ["WithWifi"]);
    }

    #[tokio::test]
    async fn search_leaves_storage_untouched() {
        let storage = MemoryStorage::new();
        let (s1, c1, _, _, _) = small_world(&storage).await;
        let before = storage.counts().await.unwrap();

        SearchService::search(&storage, &criteria(&[s1.id], &[c1.id], &[Uuid::new_v4()]))
            .await
            .unwrap();

        let after = storage.counts().await.unwrap();
        assert_eq!(before.places, after.places);
        assert_eq!(before.cities, after.cities);
        assert_eq!(names(
            &SearchService::search(&storage, &SearchCriteria::default())
                .await
                .unwrap()
        ), ["P1", "P2"]);
    }
}
