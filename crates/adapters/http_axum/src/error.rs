//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use ladsim_domain::error::{HistoryError, LadsError, NotFoundError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`LadsError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(LadsError);

impl From<LadsError> for ApiError {
    fn from(err: LadsError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            LadsError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            LadsError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            LadsError::History(err @ HistoryError::NotRegistered(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            LadsError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladsim_domain::id::NodeId;

    fn status_of(err: impl Into<LadsError>) -> StatusCode {
        ApiError(err.into()).into_response().status()
    }

    #[test]
    fn should_map_errors_to_status_codes() {
        assert_eq!(
            status_of(ValidationError::InvalidNodeId("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(NotFoundError {
                entity: "Node",
                id: "i=1".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(HistoryError::NotRegistered(NodeId::from_index(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(LadsError::NoDevices {
                type_name: "AbsorbanceReaderDeviceType".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
