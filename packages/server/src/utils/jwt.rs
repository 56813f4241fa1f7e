use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize, // Expiration timestamp
}

/// Which trust domain a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime overflows the clock")]
    Expiry,
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl TokenKind {
    fn secret(self, config: &AuthConfig) -> &[u8] {
        match self {
            TokenKind::Access => config.jwt_secret.as_bytes(),
            TokenKind::Refresh => config.jwt_refresh_secret.as_bytes(),
        }
    }

    fn ttl(self, config: &AuthConfig) -> Duration {
        match self {
            TokenKind::Access => Duration::seconds(config.access_token_ttl_secs),
            TokenKind::Refresh => Duration::seconds(config.refresh_token_ttl_secs),
        }
    }
}

/// Sign a new token of the given kind for a user.
pub fn sign(user_id: i32, kind: TokenKind, config: &AuthConfig) -> Result<String, TokenError> {
    let expiration = Utc::now()
        .checked_add_signed(kind.ttl(config))
        .ok_or(TokenError::Expiry)?
        .timestamp();

    let claims = Claims {
        user_id,
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(kind.secret(config)),
    )
    .map_err(TokenError::Sign)
}

/// Verify and decode a token against the secret of its kind.
pub fn verify(token: &str, kind: TokenKind, config: &AuthConfig) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(kind.secret(config)),
        &Validation::default(),
    )
    .map_err(TokenError::Invalid)?;
    Ok(token_data.claims)
}
