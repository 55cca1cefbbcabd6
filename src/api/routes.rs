/*
 * Responsibility
 * - URL structure: /, /health, /authorize, /callback
 * - Everything else falls through to 404 (non-GET is turned away earlier by the method guard)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{
    authorize::authorize, callback::callback, health::health, home::home, route_not_found,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/authorize", get(authorize))
        .route("/callback", get(callback))
        .fallback(route_not_found)
}
