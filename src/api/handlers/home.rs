/*
 * Responsibility
 * - GET / -> project information page
 */
use axum::{extract::State, response::Response};

use super::found;
use crate::state::AppState;

pub async fn home(State(state): State<AppState>) -> Response {
    found(&state.config.project_url)
}
