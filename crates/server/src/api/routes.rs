use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{auth_middleware, metrics_middleware};
use super::{cats, handlers, likes};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config, metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Cats (fetch + enrichment + popularity)
        .route("/cats", get(cats::fetch_cats))
        .route("/cats/likes", post(cats::enrich_cats))
        .route("/cats/popular", get(cats::popular_cats))
        .route("/cats/{api_id}/like", post(likes::toggle_like))
        // Gallery
        .route("/gallery/stats", get(cats::get_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    // The UI is served separately; CORS lets it call this API directly
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
