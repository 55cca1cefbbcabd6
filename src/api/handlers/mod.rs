pub mod authorize;
pub mod callback;
pub mod health;
pub mod home;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// 302 Found, the status browsers and the OAuth2 provider both expect for redirects here.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
