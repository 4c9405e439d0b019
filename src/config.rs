use anyhow::Context;
use serde::Deserialize;

/// Signing secrets for the two token kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
}

impl JwtConfig {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> anyhow::Result<Self> {
        let cfg = Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            anyhow::bail!("jwt secrets must not be empty");
        }
        // A shared secret would let an access token pass as a refresh token.
        if self.access_secret == self.refresh_secret {
            anyhow::bail!("access and refresh secrets must differ");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig::new(
            std::env::var("JWT_ACCESS_SECRET").context("JWT_ACCESS_SECRET is not set")?,
            std::env::var("JWT_REFRESH_SECRET").context("JWT_REFRESH_SECRET is not set")?,
        )?;
        Ok(Self {
            database_url,
            max_connections,
            jwt,
        })
    }
}
