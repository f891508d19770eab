use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::{ApiError, ApiErrorKind, ValidationError};
use thiserror::Error;

use crate::polyline::PolylineError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route query: {0}")]
    Validation(#[from] ValidationError),
    #[error("no maps API key configured")]
    MissingApiKey,
    #[error("no route found: {0}")]
    NoRoute(String),
    #[error("directions service answered {status}: {message}")]
    Upstream { status: String, message: String },
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse directions response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid step geometry: {0}")]
    Polyline(#[from] PolylineError),
}

impl RouteError {
    pub fn status_and_kind(&self) -> (StatusCode, ApiErrorKind) {
        match self {
            RouteError::Validation(_) => (StatusCode::BAD_REQUEST, ApiErrorKind::Validation),
            RouteError::MissingApiKey => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorKind::Configuration,
            ),
            RouteError::NoRoute(_) => (StatusCode::NOT_FOUND, ApiErrorKind::NotFound),
            RouteError::Upstream { .. }
            | RouteError::Http(_)
            | RouteError::Decode(_)
            | RouteError::Polyline(_) => (StatusCode::BAD_GATEWAY, ApiErrorKind::Upstream),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::warn!(%status, error = %self, "route request failed");
        } else {
            tracing::debug!(%status, error = %self, "route request rejected");
        }
        let body = ApiError {
            kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
