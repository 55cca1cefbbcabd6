/*
 * Responsibility
 * - AppError: every way a request can end in an error
 * - IntoResponse (HTTP status + fixed JSON error body)
 * - ProviderError -> AppError conversion
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::provider::ProviderError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("route not found")]
    RouteNotFound,
    #[error("no code")]
    MissingCode,
    #[error("missing host")]
    MissingHost,
    #[error("membership denied")]
    PolicyRejected,
    #[error("join error")]
    AdmissionFailed,
    // Detail stays in the logs; the client only sees the fixed message.
    #[error("upstream error")]
    Upstream(#[source] ProviderError),
    #[error("request timeout")]
    RequestTimeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::MissingCode | AppError::MissingHost => StatusCode::BAD_REQUEST,
            AppError::PolicyRejected => StatusCode::FORBIDDEN,
            AppError::AdmissionFailed | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::RouteNotFound => "ROUTE_NOT_FOUND",
            AppError::MissingCode => "MISSING_CODE",
            AppError::MissingHost => "MISSING_HOST",
            AppError::PolicyRejected => "POLICY_REJECTED",
            AppError::AdmissionFailed => "ADMISSION_FAILED",
            AppError::Upstream(_) => "UPSTREAM_FAILURE",
            AppError::RequestTimeout => "REQUEST_TIMEOUT",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AppError::MethodNotAllowed => "method not allowed",
            AppError::RouteNotFound => "route not found",
            AppError::MissingCode => "no code",
            AppError::MissingHost => "missing host",
            AppError::PolicyRejected => "membership denied",
            AppError::AdmissionFailed => "join error",
            AppError::Upstream(_) => "upstream error",
            AppError::RequestTimeout => "request timeout",
            AppError::Internal => "internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream(source) = &self {
            tracing::warn!(error = %source, "identity provider call failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Upstream(e)
    }
}
