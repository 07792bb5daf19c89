use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rentbook::config::AppConfig;
use rentbook::db;
use rentbook::handlers;
use rentbook::services::cache::Cache;
use rentbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        cache: Cache::new(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/search", get(handlers::search::search_properties))
        .route(
            "/api/properties/:id",
            get(handlers::properties::property_detail),
        )
        .route(
            "/api/properties/:id/calendar",
            get(handlers::properties::property_calendar),
        )
        .route("/api/rates", post(handlers::rates::create_rate))
        .route("/api/rates/:id", patch(handlers::rates::update_rate))
        .route("/api/rates/:id", delete(handlers::rates::delete_rate))
        .route(
            "/api/rooms/:room_id/blocks",
            post(handlers::blocks::create_block),
        )
        .route("/api/blocks/:id", patch(handlers::blocks::update_block))
        .route("/api/blocks/:id", delete(handlers::blocks::delete_block))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
