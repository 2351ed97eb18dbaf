// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, storage backend, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use db::{MemoryStorage, PgStorage, SharedStorage};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        // We continue but log error, or we could panic
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        // Use configured log level or default
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting listings-places service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize storage backend
    let storage: SharedStorage = if config.storage_backend == "memory" {
        log::info!("Storage backend: memory");
        Arc::new(MemoryStorage::new())
    } else {
        log::info!("Storage backend: postgres");
        let pool = match config::init_db_pool(&config).await {
            Ok(pool) => pool,
            Err(e) => {
                log::error!("Failed to connect to database: {}", e);
                std::process::exit(1);
            }
        };
        Arc::new(PgStorage::new(pool))
    };

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (storage backend and config)
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::places_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
