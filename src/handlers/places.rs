// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place operations
// PURPOSE: Parse requests, call services, return responses

use crate::db::SharedStorage;
use crate::errors::ApiError;
use crate::models::{CreatePlaceRequest, SearchCriteria, UpdatePlaceRequest};
use crate::services::{PlaceService, SearchService};
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// GET /cities/{city_id}/places
/// All places of a city
pub async fn list_city_places(
    storage: web::Data<SharedStorage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let places = PlaceService::list_by_city(storage.get_ref().as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(places))
}

/// POST /cities/{city_id}/places
/// Create a place under a city
///
/// The body is extracted as Option so the city existence check can run
/// before any body diagnostics.
pub async fn create_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<Uuid>,
    body: Option<web::Json<CreatePlaceRequest>>,
) -> Result<impl Responder, ApiError> {
    let place = PlaceService::create_place(
        storage.get_ref().as_ref(),
        path.into_inner(),
        body.map(web::Json::into_inner),
    )
    .await?;
    Ok(HttpResponse::Created().json(place))
}

/// GET /places/{place_id}
pub async fn get_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let place = PlaceService::get_place(storage.get_ref().as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(place))
}

/// PUT /places/{place_id}
/// Partial update; protected fields in the body are ignored
pub async fn update_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<Uuid>,
    body: Option<web::Json<UpdatePlaceRequest>>,
) -> Result<impl Responder, ApiError> {
    let place = PlaceService::update_place(
        storage.get_ref().as_ref(),
        path.into_inner(),
        body.map(web::Json::into_inner),
    )
    .await?;
    Ok(HttpResponse::Ok().json(place))
}

/// DELETE /places/{place_id}
/// Returns an empty JSON object on success
pub async fn delete_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    PlaceService::delete_place(storage.get_ref().as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// POST /places/places_search
/// Multi-criteria search; amenities are stripped from the output maps
pub async fn search_places(
    storage: web::Data<SharedStorage>,
    body: Option<web::Json<SearchCriteria>>,
) -> Result<impl Responder, ApiError> {
    let criteria = body
        .map(web::Json::into_inner)
        .ok_or_else(|| ApiError::InvalidInput("Not a JSON".to_string()))?;

    let places = SearchService::search(storage.get_ref().as_ref(), &criteria).await?;
    Ok(HttpResponse::Ok().json(places))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/cities/{city_id}/places")
            .route(web::get().to(list_city_places))
            .route(web::post().to(create_place)),
    )
    .service(
        web::scope("/places")
            .route("/places_search", web::post().to(search_places))
            .route("/{place_id}", web::get().to(get_place))
            .route("/{place_id}", web::put().to(update_place))
            .route("/{place_id}", web::delete().to(delete_place)),
    );
}
