use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failures of the credential store.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors returned by the auth core and its HTTP surface.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Uniform for every credential or refresh-token failure.
    #[error("Access denied")]
    AccessDenied,

    /// Missing or invalid bearer token at the guard.
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("store failure")]
    Store(#[source] RepoError),

    #[error("token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AuthError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        }
    }
}

impl AuthError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AuthError::Internal(msg.into())
    }

    fn code(&self) -> &'static str {
        match self {
            AuthError::DuplicateEmail => "DUPLICATE_EMAIL",
            AuthError::AccessDenied => "ACCESS_DENIED",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Store(_) | AuthError::Jwt(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::AccessDenied => StatusCode::FORBIDDEN,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Store(_) | AuthError::Jwt(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn user_message(&self) -> String {
        match self {
            AuthError::Store(e) => {
                error!(error = %e, "store failure");
                "An internal error occurred".into()
            }
            AuthError::Jwt(e) => {
                error!(error = %e, "jwt failure");
                "An internal error occurred".into()
            }
            AuthError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                "An internal error occurred".into()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
