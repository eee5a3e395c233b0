use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// ApiError
///
/// The single error taxonomy every handler speaks. Component-level failures
/// (policy denials, repository errors, storage errors) are mapped into one of
/// these variants at the handler boundary and rendered as a JSON body of the
/// form `{"msg": "..."}`, which is the wire shape the client expects.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No credential, or a credential that failed structural/signature validation.
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// A valid credential with insufficient privilege for the attempted action.
    #[error("Not authorized")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    /// A write conflicting with existing state (e.g. duplicate email).
    #[error("{0}")]
    Conflict(&'static str),

    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// An upload whose MIME type is outside the allowlist.
    #[error("{0}")]
    UnsupportedMedia(&'static str),

    /// The document store could not be reached within the configured timeout.
    #[error("Service unavailable")]
    Unavailable,

    /// Catch-all for unexpected store or I/O failures. Details are logged, never leaked.
    #[error("Server Error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicate email answers 400, matching the established API contract.
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "msg": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Store errors reaching a handler are either connectivity exhaustion (mapped to
/// 503 so callers see a retryable condition instead of an indefinite hang) or an
/// unexpected failure (logged here, surfaced as an opaque 500).
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => {
                tracing::error!("database pool timed out acquiring a connection");
                ApiError::Unavailable
            }
            other => {
                tracing::error!("database error: {:?}", other);
                ApiError::Internal
            }
        }
    }
}
