use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware};
use crate::routes::{courses, events, health, invitations, players};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Versioned API routes
    let api_routes = Router::new()
        // Event routes (v1)
        .route(
            "/api/v1/events",
            post(events::create_event).get(events::list_events),
        )
        .route(
            "/api/v1/events/:id",
            get(events::get_event).delete(events::delete_event),
        )
        // Invitation routes (v1)
        .route("/api/v1/invitations", patch(invitations::update_invitation))
        .route("/api/v1/invitations/join", post(invitations::join_event))
        // Player routes (v1)
        .route(
            "/api/v1/players",
            post(players::create_player).get(players::list_players),
        )
        .route("/api/v1/players/:player_id", get(players::get_player))
        .route(
            "/api/v1/players/:player_id/events",
            get(events::list_events_for_player),
        )
        // Course routes (v1)
        .route("/api/v1/courses", get(courses::list_courses))
        .route("/api/v1/courses/:id", get(courses::get_course));

    // Public routes (no versioning)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
