//! Gateway route handlers.

mod inference;
mod media_job;

pub use inference::handle_inference;
pub use media_job::{handle_media_download, handle_media_job};

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;
use wellspring_types::{ErrorKind, GatewayError};

/// A [`GatewayError`] rendered as the `{error, message, detail?}` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: GatewayError,
}

impl ApiError {
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self { status, error }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let err = Self::from(GatewayError::invalid_request(rejection.body_text()));
        // Oversized bodies keep their 413.
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            err.with_status(status)
        } else {
            err
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from(GatewayError::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Method fallback for the gateway routes. Never reaches the provider.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    debug!(%method, path = %uri.path(), "Rejected method");
    ApiError::from(
        GatewayError::new(ErrorKind::InvalidRequest)
            .with_message("This action is not supported.")
            .with_detail(format!("{} is not allowed on {}", method, uri.path())),
    )
    .with_status(StatusCode::METHOD_NOT_ALLOWED)
}

/// Fallback for unknown paths.
pub async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::from(
        GatewayError::new(ErrorKind::InvalidRequest)
            .with_message("This action is not supported.")
            .with_detail(format!("no route for {}", uri.path())),
    )
    .with_status(StatusCode::NOT_FOUND)
}
