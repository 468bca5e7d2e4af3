use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, queue, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = match state.upload_body_limit() {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Staging queue
        .route(
            "/queue",
            get(queue::list_queue)
                .post(queue::stage_files)
                .delete(queue::clear_queue),
        )
        .route("/queue/submit", post(queue::submit_queue))
        .route(
            "/queue/{id}",
            get(queue::get_item).delete(queue::remove_item),
        )
        .route("/queue/{id}/preview", get(queue::preview_item))
        // Real-time updates
        .route("/ws", get(ws::ws_handler))
        .layer(body_limit)
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
