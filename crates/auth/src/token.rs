//! Stateless signed identity tokens (HS256).
//!
//! There is no revocation: a compromised token stays valid until its natural
//! expiry, and rotating the secret invalidates every outstanding token at
//! once. Both are accepted limitations of the stateless design.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use orderdesk_core::UserId;

use crate::{Claims, Role};

/// Why a token failed verification.
///
/// The HTTP boundary collapses every variant into the same 401 response; the
/// distinction exists so the gate can log the actual cause.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("malformed token")]
    Malformed,

    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// Issues and verifies compact HS256 tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode and sign a token for `subject` with `iat = now`, `exp = now + ttl`.
    ///
    /// Pure computation; no side effects beyond reading the wall clock.
    pub fn issue(&self, subject: &str, uid: UserId, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            uid,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Validate the signature over header+payload and check `exp > now`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }
}
