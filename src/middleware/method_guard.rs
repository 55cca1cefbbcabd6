//! Only GET is served; anything else is a 405 on every path, including unknown ones.
//!
//! axum's own 405 only fires for paths that exist, and HEAD is accepted by `get()`.
//! Both would leak past the route table, so the check runs before routing.

use axum::{
    Router,
    body::Body,
    http::{Method, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;

pub fn apply(router: Router) -> Router {
    router.layer(middleware::from_fn(require_get))
}

async fn require_get(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if req.method() != Method::GET {
        tracing::debug!(method = %req.method(), path = req.uri().path(), "method rejected");
        return Err(AppError::MethodNotAllowed);
    }
    Ok(next.run(req).await)
}
