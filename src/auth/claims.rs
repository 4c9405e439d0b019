use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub email: String, // user email
    pub iat: usize,    // issued at (unix timestamp)
    pub exp: usize,    // expires at (unix timestamp)
    pub jti: Uuid,     // unique per token
}
