use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
#[cfg(test)]
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(handlers::public_routes())
        .merge(handlers::refresh_routes())
        .merge(handlers::protected_routes(state))
}
