use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{auth::claims::Claims, config::JwtConfig, error::AuthResult};

pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Access/refresh pair handed to the client. Never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signing keys for both token kinds, one secret each.
#[derive(Clone)]
pub struct JwtKeys {
    access: KeyPair,
    refresh: KeyPair,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            access: KeyPair::from_secret(&cfg.access_secret),
            refresh: KeyPair::from_secret(&cfg.refresh_secret),
        }
    }

    fn sign(&self, keys: &KeyPair, user_id: Uuid, email: &str, ttl: Duration) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            jti: Uuid::new_v4(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
    }

    pub fn sign_access(&self, user_id: Uuid, email: &str) -> AuthResult<String> {
        self.sign(&self.access, user_id, email, ACCESS_TOKEN_TTL)
    }

    pub fn sign_refresh(&self, user_id: Uuid, email: &str) -> AuthResult<String> {
        self.sign(&self.refresh, user_id, email, REFRESH_TOKEN_TTL)
    }

    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> AuthResult<TokenPair> {
        let pair = TokenPair {
            access_token: self.sign_access(user_id, email)?,
            refresh_token: self.sign_refresh(user_id, email)?,
        };
        debug!(user_id = %user_id, "token pair signed");
        Ok(pair)
    }

    fn verify(keys: &KeyPair, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &keys.decoding, &validation)?;
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&self.access, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&self.refresh, token)
    }
}

#[cfg(test)]
pub(crate) fn test_keys() -> JwtKeys {
    JwtKeys::new(&JwtConfig::new("test-access-secret", "test-refresh-secret").expect("valid jwt config"))
}
