//! Mapping core errors onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use pinhash_common::{PinHashError, StatusView};

/// Error returned by handlers; always rendered as a status message
#[derive(Debug)]
pub struct ApiError(pub PinHashError);

impl From<PinHashError> for ApiError {
    fn from(err: PinHashError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: StatusView,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.0.to_string();

        if self.0.is_fatal() {
            tracing::error!(error = %message, "Request failed");
        } else {
            tracing::debug!(error = %message, "Request rejected");
        }

        let body = ErrorBody {
            status: StatusView::failure(message.clone()),
            error: message,
        };
        (code, Json(body)).into_response()
    }
}
