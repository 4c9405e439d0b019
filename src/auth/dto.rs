use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

/// Request body for signup and signin.
#[derive(Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl AuthRequest {
    /// Lower-cases the email and rejects malformed input.
    pub fn validate(mut self) -> Result<Self, AuthError> {
        self.email = self.email.trim().to_lowercase();
        if !is_valid_email(&self.email) {
            return Err(AuthError::Validation("Invalid email".into()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("Password must not be empty".into()));
        }
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn validate_normalizes_email() {
        let r = req("  Alice@Example.COM ", "pw").validate().unwrap();
        assert_eq!(r.email, "alice@example.com");
    }

    #[test]
    fn validate_rejects_bad_input() {
        assert!(matches!(req("not-an-email", "pw").validate(), Err(AuthError::Validation(_))));
        assert!(matches!(req("a@x.com", "").validate(), Err(AuthError::Validation(_))));
    }
}
