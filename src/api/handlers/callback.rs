/*
 * Responsibility
 * - GET /callback?code=...
 * - Validate the query, then hand the code to services::admission
 * - Success -> 302 to the target guild in the Discord client
 */
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Response,
};

use super::found;
use crate::{
    api::{dto::callback::CallbackQuery, extractors::CallbackUrl},
    error::AppError,
    services::admission,
    state::AppState,
};

pub async fn callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackQuery>, QueryRejection>,
    // Deferred so a missing code is reported before a missing host.
    callback_url: Result<CallbackUrl, AppError>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable callback query");
        AppError::MissingCode
    })?;

    if let Some(error) = &query.error {
        tracing::info!(
            error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "authorization was not granted"
        );
    }

    let code = query.code()?;
    let CallbackUrl(redirect_uri) = callback_url?;

    let admitted = admission::admit(&state.provider, &state.config, code, &redirect_uri).await?;
    tracing::debug!(
        user_id = %admitted.user_id,
        newly_joined = admitted.newly_joined,
        "redirecting to guild"
    );

    Ok(found(&state.config.guild_view_url()))
}
