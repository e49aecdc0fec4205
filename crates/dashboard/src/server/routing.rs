//! Axum router configuration for all endpoints

use axum::{middleware::from_fn, routing::get, Router};

use crate::server::handlers::{perspective, posts, status};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/status", get(status::status))
    // Post browsing
    .route("/posts", get(posts::list_posts))
    .route("/posts/{id}", get(posts::get_post))
    .route("/tags", get(posts::list_tags))
    // Summaries
    .route("/perspective", get(perspective::overview))
    .route("/perspective/grouped", get(perspective::grouped))
    .layer(from_fn(request_context_middleware))
    .with_state(state)
}
