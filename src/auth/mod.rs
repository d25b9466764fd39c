use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::{Owned, User};
use crate::database::repository::Scope;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, expire_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            exp: (now + Duration::minutes(expire_minutes)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSubject)
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT subject is not a user id")]
    InvalidSubject,
}

/// Sign an access token for `user_id`
pub fn issue_token(security: &SecurityConfig, user_id: Uuid) -> Result<String, JwtError> {
    if security.secret_key.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let claims = Claims::new(user_id, security.access_token_expire_minutes);
    let encoding_key = EncodingKey::from_secret(security.secret_key.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry, returning the claims
pub fn decode_token(security: &SecurityConfig, token: &str) -> Result<Claims, JwtError> {
    if security.secret_key.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.secret_key.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// The authenticated caller as seen by resource logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub is_superuser: bool,
}

impl Principal {
    /// Superusers see everything; everyone else sees what they own.
    pub fn can_access<R: Owned + ?Sized>(&self, resource: &R) -> bool {
        self.is_superuser || resource.owner_id() == self.id
    }

    /// Listing filter equivalent to `can_access`
    pub fn scope(&self) -> Scope {
        if self.is_superuser {
            Scope::All
        } else {
            Scope::OwnedBy(self.id)
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            is_superuser: user.is_superuser,
        }
    }
}
