use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::User;
use crate::error::RepoError;

/// In-process store used by tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(RepoError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            refresh_token_hash: None,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<(), RepoError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.refresh_token_hash = hash.map(str::to_string);
        }
        Ok(())
    }

    async fn clear_refresh_hash(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if user.refresh_token_hash.is_some() => {
                user.refresh_token_hash = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create("a@x.com", "h1").await.expect("first create");
        let err = store.create("a@x.com", "h2").await.unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn clear_refresh_hash_is_conditional() {
        let store = MemoryUserStore::new();
        let user = store.create("a@x.com", "h").await.unwrap();
        assert!(!store.clear_refresh_hash(user.id).await.unwrap());

        store.update_refresh_hash(user.id, Some("rt")).await.unwrap();
        assert!(store.clear_refresh_hash(user.id).await.unwrap());
        let user = store.find_by_id(user.id).await.unwrap().unwrap();
        assert!(user.refresh_token_hash.is_none());
    }

    #[tokio::test]
    async fn lookups_by_email_and_id_agree() {
        let store = MemoryUserStore::new();
        let created = store.create("b@x.com", "h").await.unwrap();
        let by_email = store.find_by_email("b@x.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_email.id, by_id.id);
        assert!(store.find_by_email("missing@x.com").await.unwrap().is_none());
    }
}
