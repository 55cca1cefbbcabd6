/*
 * Responsibility
 * - Work out the absolute URL of our own /callback endpoint for the current request
 * - PUBLIC_BASE_URL wins when configured; otherwise the origin the client used
 *   (X-Forwarded-Proto / X-Forwarded-Host / Host)
 * - No usable host -> AppError::MissingHost (400)
 */
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use url::Url;

use crate::{error::AppError, state::AppState};

const CALLBACK_PATH: &str = "callback";

/// Absolute redirect URI registered with the provider for this request.
#[derive(Debug, Clone)]
pub struct CallbackUrl(pub Url);

impl FromRequestParts<AppState> for CallbackUrl {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let origin = match &state.config.public_base_url {
            Some(base) => base.clone(),
            None => request_origin(parts)?,
        };
        Ok(Self(callback_url(origin)))
    }
}

fn request_origin(parts: &Parts) -> Result<Url, AppError> {
    // Scheme names are case-insensitive.
    let scheme = first_value(&parts.headers, "x-forwarded-proto")
        .and_then(|p| ["https", "http"].into_iter().find(|s| p.eq_ignore_ascii_case(s)))
        .unwrap_or("http");

    let host = first_value(&parts.headers, "x-forwarded-host")
        .or_else(|| first_value(&parts.headers, header::HOST.as_str()))
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
        .ok_or(AppError::MissingHost)?;

    let origin = Url::parse(&format!("{scheme}://{host}")).map_err(|_| AppError::MissingHost)?;
    // A Host header smuggling a path or credentials is not an origin.
    if origin.path() != "/" || !origin.username().is_empty() || origin.password().is_some() {
        return Err(AppError::MissingHost);
    }
    Ok(origin)
}

// Proxies may append to forwarded headers; the first entry is the client-facing one.
fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn callback_url(mut origin: Url) -> Url {
    origin.set_query(None);
    origin.set_fragment(None);
    if let Ok(mut segments) = origin.path_segments_mut() {
        segments.pop_if_empty().push(CALLBACK_PATH);
    }
    origin
}
