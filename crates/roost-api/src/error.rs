use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use roost_types::api::ErrorResponse;

/// Failures an admin procedure reports to its caller.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Couldn't find that user.")]
    UserNotFound,

    #[error("Geometry must be a MultiPolygon.")]
    NoMultiPolygon,

    #[error("Invalid birthdate.")]
    InvalidBirthdate,

    /// Request body that isn't the JSON the procedure takes.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Missing or invalid credentials.")]
    Unauthenticated,

    #[error("Admin privileges required.")]
    PermissionDenied,

    /// Storage, collaborator and parse failures. Never shown to the caller.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Transport-level status, in the vocabulary of RPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Internal => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AdminError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound => ErrorCode::NotFound,
            Self::NoMultiPolygon | Self::InvalidBirthdate | Self::InvalidRequest(_) => {
                ErrorCode::InvalidArgument
            }
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::PermissionDenied => ErrorCode::PermissionDenied,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<JsonRejection> for AdminError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let code = self.code();
        let message = match &self {
            Self::Internal(e) => {
                error!("Admin call failed: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            code.status(),
            Json(ErrorResponse {
                code: code.as_str().to_string(),
                message,
            }),
        )
            .into_response()
    }
}
