//! HTTP-level middleware (cross-cutting concerns).
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id), so a callback's log
//!   lines can be tied to the browser request that caused them
//! - Access logging / request tracing (TraceLayer)
//! - Body size limit (every route is a GET; bodies are never read)
//! - Global timeout, sized from `Config` so it never fires before the
//!   callback chain's own upstream timeouts do
//!
//! Request-id and trace sit outside the error handler, so a timeout
//! response is still tagged and logged like any other.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

// token exchange, profile, guilds, add member
const UPSTREAM_CALLS_PER_REQUEST: u32 = 4;
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Inbound budget: every upstream call may use its full timeout, plus slack for
/// our own work. A slow provider therefore surfaces as a 502 from the callback,
/// never as a timeout cutting off an admission already sent.
pub fn request_timeout(config: &Config) -> Duration {
    config.upstream_timeout * UPSTREAM_CALLS_PER_REQUEST + REQUEST_TIMEOUT_SLACK
}

/// Apply HTTP-level middleware to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(HandleErrorLayer::new(|err: BoxError| async move { error_response(err) }))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(request_timeout(config)));

    router.layer(layers)
}

fn error_response(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("request timed out");
        AppError::RequestTimeout.into_response()
    } else {
        tracing::error!(error = %err, "unhandled middleware error");
        AppError::Internal.into_response()
    }
}
