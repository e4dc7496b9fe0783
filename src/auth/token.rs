// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Tokens live for one hour
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
///
/// Signs with HS256 using the secret supplied at startup. There is no
/// refresh or revocation: a token stays valid until `exp`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: TOKEN_LIFETIME_SECS,
        }
    }

    /// Token lifetime in seconds
    pub fn lifetime(&self) -> i64 {
        self.lifetime
    }

    /// Issue a token for the given identity, valid from now
    pub fn issue(&self, id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue_at(id, email, Utc::now().timestamp())
    }

    fn issue_at(&self, id: Uuid, email: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: issued_at,
            exp: issued_at + self.lifetime,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}
