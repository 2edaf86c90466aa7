//! Streaming Catalog Service - Main Application Entry Point
//!
//! REST API server for a streaming-video catalog and viewer-management
//! backend: series, episodes, contracts, reference data, viewer accounts,
//! view history, and the country reconciliation workflow.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Passwords**: Argon2id hashes on the login credentials
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod models;
mod services;

use tracing_subscriber::EnvFilter;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let app = Router::new()
        .route("/api/health", get(handlers::health::health_check))
        // Authentication
        .route("/api/signup", post(handlers::auth::signup))
        .route("/api/login", post(handlers::auth::login))
        // Reference data
        .route("/api/genres", get(handlers::reference::list_genres))
        .route("/api/languages", get(handlers::reference::list_languages))
        .route("/api/countries", get(handlers::reference::list_countries))
        .route(
            "/api/production-houses",
            get(handlers::reference::list_production_houses),
        )
        // Catalog
        .route(
            "/api/series",
            get(handlers::series::list_series).post(handlers::series::create_series),
        )
        .route("/api/series/full", post(handlers::series::create_series_full))
        .route("/api/series/{id}", delete(handlers::series::delete_series))
        .route(
            "/api/series/{id}/episodes",
            get(handlers::series::series_episodes),
        )
        .route(
            "/api/episodes",
            get(handlers::episodes::list_episodes).post(handlers::episodes::create_episode),
        )
        .route("/api/contracts", get(handlers::contracts::list_contracts))
        .route(
            "/api/contracts/renew",
            post(handlers::contracts::renew_contract),
        )
        .route("/api/browse", get(handlers::series::browse))
        // Engagement
        .route("/api/view", post(handlers::engagement::record_view))
        .route("/api/feedback", post(handlers::engagement::submit_feedback))
        .route(
            "/api/history/{account_id}",
            get(handlers::engagement::get_history).delete(handlers::engagement::clear_history),
        )
        .route(
            "/api/history/{account_id}/{view_id}",
            delete(handlers::engagement::delete_history_item),
        )
        // Viewer self-service and admin listing
        .route(
            "/api/profile/{id}",
            get(handlers::viewers::get_profile)
                .put(handlers::viewers::update_profile)
                .delete(handlers::viewers::delete_profile),
        )
        .route("/api/viewers", get(handlers::viewers::list_viewers))
        // Analytics
        .route(
            "/api/analytics/top-series",
            get(handlers::analytics::top_series),
        )
        .route(
            "/api/analytics/genre-distribution",
            get(handlers::analytics::genre_distribution),
        )
        // Admin: countries and reconciliation
        .route(
            "/api/admin/countries",
            get(handlers::admin::list_countries).post(handlers::admin::create_country),
        )
        .route(
            "/api/admin/countries/{id}",
            put(handlers::admin::update_country).delete(handlers::admin::delete_country),
        )
        .route(
            "/api/admin/suggestions",
            get(handlers::admin::list_suggestions),
        )
        .route(
            "/api/admin/approve-country",
            post(handlers::admin::approve_country),
        )
        // Admin: viewer charge and status
        .route(
            "/api/admin/viewers/{id}/charge",
            get(handlers::viewers::get_charge).put(handlers::viewers::update_charge),
        )
        .route(
            "/api/admin/viewers/{id}/status",
            get(handlers::viewers::get_status).put(handlers::viewers::update_status),
        )
        // Admin: production houses
        .route(
            "/api/admin/production-houses",
            get(handlers::admin::list_production_houses)
                .post(handlers::admin::create_production_house),
        )
        .route(
            "/api/admin/production-houses/{id}",
            put(handlers::admin::update_production_house)
                .delete(handlers::admin::delete_production_house),
        )
        // The original service sat behind a permissive CORS policy
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share database pool with all handlers via State extraction
        .with_state(pool);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
