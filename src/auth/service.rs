use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::{
    jwt::{JwtKeys, TokenPair},
    password::Hasher,
    repo::UserStore,
};
use crate::error::{AuthError, AuthResult};

/// Credential and token lifecycle: signup, signin, refresh rotation, logout.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    keys: JwtKeys,
    hasher: Hasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, keys: JwtKeys, hasher: Hasher) -> Self {
        Self {
            store,
            keys,
            hasher,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn signup(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let password_hash = self.hasher.hash_blocking(password.to_string()).await?;

        let user = match self.store.create(email, &password_hash).await {
            Ok(u) => u,
            Err(e) => {
                let err = AuthError::from(e);
                if matches!(err, AuthError::DuplicateEmail) {
                    warn!(email, "email already registered");
                }
                return Err(err);
            }
        };

        let tokens = self.issue_tokens(user.id, &user.email).await?;
        info!(user_id = %user.id, "user registered");
        Ok(tokens)
    }

    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> AuthResult<TokenPair> {
        let Some(user) = self.store.find_by_email(email).await? else {
            warn!(email, "signin unknown email");
            return Err(AuthError::AccessDenied);
        };

        let matches = self
            .hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        if !matches {
            warn!(user_id = %user.id, "signin invalid password");
            return Err(AuthError::AccessDenied);
        }

        let tokens = self.issue_tokens(user.id, &user.email).await?;
        info!(user_id = %user.id, "user signed in");
        Ok(tokens)
    }

    /// Ends the session. Succeeds whether or not one was active.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Uuid) -> AuthResult<()> {
        let cleared = self.store.clear_refresh_hash(user_id).await?;
        info!(user_id = %user_id, cleared, "user logged out");
        Ok(())
    }

    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, user_id: Uuid, refresh_token: &str) -> AuthResult<TokenPair> {
        let Some(user) = self.store.find_by_id(user_id).await? else {
            warn!(user_id = %user_id, "refresh for unknown user");
            return Err(AuthError::AccessDenied);
        };
        let Some(stored_hash) = user.refresh_token_hash else {
            warn!(user_id = %user_id, "refresh without active session");
            return Err(AuthError::AccessDenied);
        };

        let matches = self
            .hasher
            .verify_blocking(refresh_token.to_string(), stored_hash)
            .await?;
        if !matches {
            warn!(user_id = %user_id, "refresh token superseded or foreign");
            return Err(AuthError::AccessDenied);
        }

        let tokens = self.issue_tokens(user.id, &user.email).await?;
        info!(user_id = %user.id, "tokens refreshed");
        Ok(tokens)
    }

    /// Signs a new pair and makes its refresh token the only valid one.
    async fn issue_tokens(&self, user_id: Uuid, email: &str) -> AuthResult<TokenPair> {
        let tokens = self.keys.issue_pair(user_id, email)?;
        self.rotate_refresh_hash(user_id, &tokens.refresh_token).await?;
        Ok(tokens)
    }

    async fn rotate_refresh_hash(&self, user_id: Uuid, refresh_token: &str) -> AuthResult<()> {
        let hash = self.hasher.hash_blocking(refresh_token.to_string()).await?;
        self.store.update_refresh_hash(user_id, Some(&hash)).await?;
        Ok(())
    }
}
