// src/handlers/health.rs
// DOCUMENTATION: Health check and stats handlers
// PURPOSE: Verify service status and report stored entity counts

use crate::db::{SharedStorage, Storage};
use crate::errors::ApiError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "listings-places",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /stats
/// Number of stored objects per entity type
pub async fn stats(storage: web::Data<SharedStorage>) -> Result<impl Responder, ApiError> {
    let counts = storage.counts().await?;
    Ok(HttpResponse::Ok().json(counts))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/stats", web::get().to(stats));
}
