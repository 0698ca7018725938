//! JWT Token Handler
//! Mission: Generate and validate JWT tokens securely

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

/// Why a presented token was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,
    #[error("expired token")]
    ExpiredToken,
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no clock-skew grace period
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration_hours: 24, // 24-hour tokens by default
        }
    }

    pub fn with_expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Generate a JWT token for a user id.
    /// Returns the token and its lifetime in seconds.
    pub fn generate_token(&self, user_id: &str) -> Result<(String, usize)> {
        let now = Utc::now();
        let lifetime = chrono::Duration::try_hours(self.expiration_hours)
            .context("Token lifetime out of range")?;
        let expiration = now
            .checked_add_signed(lifetime)
            .context("Invalid timestamp")?
            .timestamp() as usize;

        // A lifetime in the past still signs; it reports zero seconds left
        let expires_in = self
            .expiration_hours
            .checked_mul(3600)
            .context("Token lifetime out of range")?
            .max(0) as usize;

        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!(
            "Generating JWT for user {}, expires in {}h",
            user_id, self.expiration_hours
        );

        let token = self.sign(&claims)?;
        Ok((token, expires_in))
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate a JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        let decoded =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                    _ => TokenError::InvalidToken,
                }
            })?;

        debug!("Validated JWT for user {}", decoded.claims.user_id);

        Ok(decoded.claims)
    }
}
