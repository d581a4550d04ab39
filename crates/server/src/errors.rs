use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error answer for JSON endpoints. The status is chosen per endpoint; some
/// negative outcomes deliberately travel with 200.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Blocked book or review mutation on an update/delete path.
    pub fn book_absent() -> Self {
        Self::new(StatusCode::OK, "Book does not exist.")
    }

    /// Field-set errors in the catalog services' wording.
    pub fn from_model(err: ModelError) -> Self {
        match err {
            ModelError::EmptySubmission => Self::bad_request("No data loaded"),
            ModelError::MissingFields(_) => Self::bad_request("Missing required fields"),
            ModelError::InvalidField(name) => Self::bad_request(format!("Invalid field: {name}")),
            ModelError::Db(msg) => Self::internal(msg),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Model(e) => Self::from_model(e),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::UnverifiedBook { .. } => Self::not_found("Book not found"),
            ServiceError::Remote(msg) => Self::new(StatusCode::BAD_GATEWAY, msg),
            ServiceError::Db(msg) => Self::internal(msg),
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::consistency::ExistenceCheck;

    #[test]
    fn field_errors_are_bad_requests() {
        let e = JsonApiError::from_model(ModelError::InvalidField("year"));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "Invalid field: year");
        assert_eq!(JsonApiError::from_model(ModelError::EmptySubmission).message, "No data loaded");
    }

    #[test]
    fn unverified_book_defaults_to_not_found() {
        let e: JsonApiError = ServiceError::UnverifiedBook {
            book_ref: "9".into(),
            outcome: ExistenceCheck::DependencyUnavailable,
        }
        .into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.message, "Book not found");
    }
}
