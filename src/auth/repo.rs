use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::RepoError;

/// Keyed access to user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    /// Fails with `RepoError::DuplicateEmail` when the email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError>;
    async fn update_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<(), RepoError>;
    /// Clears the refresh hash only when one is set. Returns whether a row changed.
    async fn clear_refresh_hash(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::DuplicateEmail,
        _ => RepoError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, refresh_token_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, refresh_token_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, refresh_token_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn clear_refresh_hash(&self, id: Uuid) -> Result<bool, RepoError> {
        let res = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = NULL, updated_at = now()
            WHERE id = $1 AND refresh_token_hash IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
