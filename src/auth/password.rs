use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::{AuthError, AuthResult};

/// Salted Argon2id hashing for passwords and refresh tokens.
#[derive(Clone, Default)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl Hasher {
    /// Minimal cost parameters so tests stay fast.
    #[cfg(test)]
    pub fn fast() -> Self {
        use argon2::{Algorithm, Params, Version};
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("valid argon2 params");
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn hash(&self, plain: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                AuthError::internal(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// `Ok(false)` on mismatch; an unparseable stored hash is an error.
    pub fn verify(&self, plain: &str, hash: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            AuthError::internal(e.to_string())
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash_blocking(&self, plain: String) -> AuthResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| AuthError::internal(e.to_string()))?
    }

    pub async fn verify_blocking(&self, plain: String, hash: String) -> AuthResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AuthError::internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = Hasher::default();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert_ne!(hash, password);
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = Hasher::fast();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_input_gets_distinct_salts() {
        let hasher = Hasher::fast();
        let a = hasher.hash("pw").unwrap();
        let b = hasher.hash("pw").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("pw", &a).unwrap());
        assert!(hasher.verify("pw", &b).unwrap());
    }

    #[test]
    fn long_inputs_are_hashed_in_full() {
        // Two tokens sharing a long prefix must not collide.
        let hasher = Hasher::fast();
        let prefix = "x".repeat(100);
        let hash = hasher.hash(&format!("{prefix}a")).unwrap();
        assert!(!hasher.verify(&format!("{prefix}b"), &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = Hasher::fast().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_sync_ones() {
        let hasher = Hasher::fast();
        let hash = hasher.hash_blocking("pw".into()).await.unwrap();
        assert!(hasher.verify_blocking("pw".into(), hash.clone()).await.unwrap());
        assert!(!hasher.verify_blocking("other".into(), hash).await.unwrap());
    }
}
