//! Error types for the SciBowl Arena API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that converts
//! into an Axum HTTP response. Every error body is an [`ApiResponse`] with
//! `data: null` and the message in `error`, so clients can treat the
//! presence of `error` as "data is not authoritative".

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scibowl_core::auth::AuthError;
use scibowl_core::store::CatalogError;
use scibowl_types::ApiResponse;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed JSON or a payload that failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Missing, invalid, or rejected credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with existing data.
    #[error("{0}")]
    Conflict(String),

    /// An internal error occurred.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => Self::NotFound(err.to_string()),
            CatalogError::Conflict(msg) => Self::Conflict(msg),
            CatalogError::Validation(msg) => Self::BadRequest(msg),
            CatalogError::Unauthorized(msg) => Self::Unauthorized(msg),
            CatalogError::Exhausted(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::WrongKind { .. } => {
                Self::Unauthorized(err.to_string())
            }
            AuthError::Hash(_) | AuthError::Signing(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::BadRequest(validation_message(&errors))
    }
}

/// Join field validation messages into one line, ordered by field name.
pub fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect();
    if messages.is_empty() {
        String::from("Invalid request body")
    } else {
        messages.join("; ")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

/// Result of a JSON handler.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Result of a JSON handler that creates something.
pub type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Wrap `data` in a success envelope.
pub const fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Wrap `data` in a success envelope with `201 Created`.
pub const fn created<T>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::ok(data)))
}
