//! Session token issuing and verification
//!
//! Tokens are HS256 JWTs over whatever JSON object the caller posts to
//! `/jwt`, plus server-set `iat`/`exp` claims. Nothing is persisted: a token
//! is valid exactly as long as its signature checks out and `exp` has not
//! passed. There is no refresh or revocation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use studycamp_core::AuthConfig;
use thiserror::Error;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token service failures.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is not configured")]
    SecretUnavailable,

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),
}

/// Decoded claims of a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// The `email` claim, when it is a string.
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// Whether the token carries a usable `email` claim.
    ///
    /// Absent, null, false, zero and empty-string values do not count.
    pub fn has_email(&self) -> bool {
        match self.0.get("email") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().map_or(true, |v| v != 0.0),
            Some(_) => true,
        }
    }

    /// Expiry as a Unix timestamp.
    pub fn expires_at(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Signs and verifies session tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<(EncodingKey, DecodingKey)>,
    ttl: Duration,
}

impl TokenService {
    /// Create a service signing with `secret`.
    ///
    /// A missing or empty secret is accepted; issuing then fails and every
    /// presented token is rejected.
    pub fn new(secret: Option<&str>, ttl: Duration) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|s| {
            (
                EncodingKey::from_secret(s.as_bytes()),
                DecodingKey::from_secret(s.as_bytes()),
            )
        });

        Self { keys, ttl }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.access_token_secret.as_deref(),
            Duration::hours(config.token_ttl_hours),
        )
    }

    /// Whether a signing secret is configured.
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign `payload` as-is with a fresh `iat` and `exp`.
    ///
    /// Caller-supplied `iat`/`exp` values are overwritten.
    pub fn issue(&self, payload: Map<String, Value>) -> Result<String, TokenError> {
        let (encoding_key, _) = self.keys.as_ref().ok_or(TokenError::SecretUnavailable)?;

        let now = Utc::now();
        let mut claims = payload;
        claims.insert("iat".to_string(), Value::from(now.timestamp()));
        claims.insert("exp".to_string(), Value::from((now + self.ttl).timestamp()));

        encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key).map_err(TokenError::Signing)
    }

    /// Check signature and expiry and return the decoded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (_, decoding_key) = self.keys.as_ref().ok_or(TokenError::SecretUnavailable)?;

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        // Payloads are caller-defined, so an `aud` claim is opaque data here.
        validation.validate_aud = false;

        decode::<Map<String, Value>>(token, decoding_key, &validation)
            .map(|data| TokenClaims(data.claims))
            .map_err(TokenError::Rejected)
    }
}
