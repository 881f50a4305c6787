//! HTTP error response mapping.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shelf_domain::error::ShelfError;
use shelf_domain::time::{now, to_rfc3339};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    timestamp: String,
    status: u16,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<&'static str, String>>,
}

/// Maps a failed request to an HTTP response with appropriate status code.
pub enum ApiError {
    /// A domain or application error.
    Shelf(ShelfError),
    /// The request body is not the JSON the endpoint expects.
    Body(JsonRejection),
    /// The query string does not fit the endpoint's parameters.
    Query(QueryRejection),
}

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        Self::Shelf(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Body(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::Query(err)
    }
}

impl ApiError {
    fn parts(self) -> (StatusCode, String, Option<BTreeMap<&'static str, String>>) {
        match self {
            Self::Shelf(ShelfError::Validation(err)) => {
                let message = err.to_string();
                let errors = BTreeMap::from([(err.field(), message.clone())]);
                (StatusCode::BAD_REQUEST, message, Some(errors))
            }
            Self::Shelf(ShelfError::NotFound(err)) => {
                (StatusCode::NOT_FOUND, err.to_string(), None)
            }
            Self::Shelf(ShelfError::Conflict(err)) => (StatusCode::CONFLICT, err.to_string(), None),
            Self::Shelf(ShelfError::Storage(err)) => {
                tracing::error!(error = ?err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                    None,
                )
            }
            Self::Body(rejection) => {
                tracing::debug!(error = %rejection, "rejected request body");
                (StatusCode::BAD_REQUEST, rejection.body_text(), None)
            }
            Self::Query(rejection) => {
                tracing::debug!(error = %rejection, "rejected query string");
                (StatusCode::BAD_REQUEST, rejection.body_text(), None)
            }
        }
    }
}

fn category(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Validation Error",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::CONFLICT => "Conflict",
        _ => "Internal Server Error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = self.parts();
        let body = ErrorBody {
            timestamp: to_rfc3339(now()),
            status: status.as_u16(),
            error: category(status),
            message,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
