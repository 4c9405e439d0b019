use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AuthError;

/// Identity established by the access-token guard.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    // Read Authorization header
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    // Expect "Bearer <token>"
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or(AuthError::Unauthorized)
}

/// Guard stage for routes that need an authenticated caller.
pub async fn require_access_token(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;
    let claims = keys.verify_access(token).map_err(|e| {
        warn!(error = %e, "invalid or expired access token");
        AuthError::Unauthorized
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });
    Ok(next.run(request).await)
}

/// Caller authenticated by a refresh token, with the raw token kept for
/// comparison against the stored hash.
pub struct RefreshUser {
    pub id: Uuid,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(&parts.headers)?;
        let claims = keys.verify_refresh(token).map_err(|e| {
            warn!(error = %e, "invalid or expired refresh token");
            AuthError::Unauthorized
        })?;

        Ok(RefreshUser {
            id: claims.sub,
            token: token.to_string(),
        })
    }
}
