//! HTTP router setup.

use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/group/{slug}/", get(handlers::group_posts))
        .route("/profile/{username}/", get(handlers::profile))
        .route("/posts/{id}/", get(handlers::post_detail))
        .route(
            "/create/",
            get(handlers::post_create_form).post(handlers::post_create),
        )
        .route(
            "/posts/{id}/edit/",
            get(handlers::post_edit_form).post(handlers::post_edit),
        )
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::track_requests,
        ))
        .layer(axum::middleware::from_fn(middleware::inject_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
