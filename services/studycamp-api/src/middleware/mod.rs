pub mod auth;

pub use auth::{authenticate, require_token, AuthError, VerifiedClaims};
