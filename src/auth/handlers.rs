use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::post,
    Extension, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthRequest, LogoutResponse},
        extractors::{require_access_token, CurrentUser, RefreshUser},
        jwt::TokenPair,
    },
    error::AuthResult,
    state::AppState,
};

/// Reachable without any token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/local/signup", post(signup))
        .route("/auth/local/signin", post(signin))
}

/// Authenticated by the refresh token instead of the access token.
pub fn refresh_routes() -> Router<AppState> {
    Router::new().route("/auth/refresh", post(refresh))
}

/// Behind the access-token guard.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, require_access_token))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> AuthResult<(StatusCode, Json<TokenPair>)> {
    let payload = payload.validate()?;
    let tokens = state.auth.signup(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> AuthResult<Json<TokenPair>> {
    let payload = payload.validate()?;
    let tokens = state.auth.signin(&payload.email, &payload.password).await?;
    Ok(Json(tokens))
}

#[instrument(skip(state, user), fields(user_id = %user.id, email = %user.email))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AuthResult<Json<LogoutResponse>> {
    state.auth.logout(user.id).await?;
    Ok(Json(LogoutResponse { success: true }))
}

#[instrument(skip(state, caller), fields(user_id = %caller.id))]
pub async fn refresh(
    State(state): State<AppState>,
    caller: RefreshUser,
) -> AuthResult<Json<TokenPair>> {
    let tokens = state.auth.refresh(caller.id, &caller.token).await?;
    Ok(Json(tokens))
}
