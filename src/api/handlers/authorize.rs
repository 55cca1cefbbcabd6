/*
 * Responsibility
 * - GET /authorize -> Discord authorization screen
 * - The redirect_uri is our own /callback on the origin the browser used
 */
use axum::{extract::State, response::Response};

use super::found;
use crate::{
    api::extractors::CallbackUrl, services::provider::ProviderClient, state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    CallbackUrl(redirect_uri): CallbackUrl,
) -> Response {
    let url = ProviderClient::authorization_url(
        &state.config.web_base_url,
        &state.config.client_id,
        &redirect_uri,
    );
    tracing::debug!(%redirect_uri, "redirecting to authorization screen");
    found(url.as_str())
}
