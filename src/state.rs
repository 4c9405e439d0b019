use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{
    jwt::JwtKeys,
    password::Hasher,
    repo::{PgUserStore, UserStore},
    service::AuthService,
};
use crate::config::{AppConfig, JwtConfig};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        let store = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        Ok(Self::from_parts(&config.jwt, store, Hasher::default()))
    }

    pub fn from_parts(jwt: &JwtConfig, store: Arc<dyn UserStore>, hasher: Hasher) -> Self {
        Self {
            auth: AuthService::new(store, JwtKeys::new(jwt), hasher),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::memory::MemoryUserStore;

        let jwt = JwtConfig::new("test-access-secret", "test-refresh-secret")
            .expect("valid jwt config");
        let store = Arc::new(MemoryUserStore::new()) as Arc<dyn UserStore>;
        Self::from_parts(&jwt, store, Hasher::fast())
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.auth.keys().clone()
    }
}
