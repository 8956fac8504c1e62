//! Session token verification middleware
//!
//! `require_token` is ready to wrap any route that needs a caller identity,
//! but no route in [`crate::rest::build_router`] currently uses it.
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/mine", get(handler))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_token));
//! ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ErrorResponse;
use crate::token::{TokenClaims, TokenService};

/// Why a request failed token verification. Always answered with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header.
    #[error("Unauthorized access")]
    Missing,

    /// Bad signature, expired, malformed, or no signing secret configured.
    #[error("Invalid token")]
    Invalid,

    /// Verified token without an `email` claim.
    #[error("Invalid token payload")]
    MissingClaim,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}

/// Claims of the token that authenticated the current request.
#[derive(Debug, Clone)]
pub struct VerifiedClaims(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedClaims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedClaims>()
            .cloned()
            .ok_or(AuthError::Missing)
    }
}

/// Verify the credential in `headers`.
///
/// The token is the second space-separated word of `Authorization`
/// (`Bearer <token>`).
pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> Result<TokenClaims, AuthError> {
    let authorization = headers.get(AUTHORIZATION).ok_or(AuthError::Missing)?;

    let token = authorization
        .to_str()
        .ok()
        .and_then(|value| value.split(' ').nth(1))
        .ok_or(AuthError::Invalid)?;

    let claims = tokens.verify(token).map_err(|e| {
        debug!("Token verification failed: {}", e);
        AuthError::Invalid
    })?;

    if !claims.has_email() {
        return Err(AuthError::MissingClaim);
    }

    Ok(claims)
}

/// Middleware rejecting requests without a valid session token.
///
/// On success the decoded claims are stored in the request extensions and
/// can be extracted with [`VerifiedClaims`].
pub async fn require_token(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = authenticate(&tokens, request.headers()).map_err(|e| {
        warn!("Rejected request to {}: {}", request.uri().path(), e);
        e
    })?;

    debug!("Token verified for {}", request.uri().path());
    request.extensions_mut().insert(VerifiedClaims(claims));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        middleware,
        routing::get,
        Router,
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn whoami(VerifiedClaims(claims): VerifiedClaims) -> String {
        claims.email().unwrap_or_default().to_string()
    }

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(Some("test-secret"), Duration::hours(24)))
    }

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(tokens, require_token))
    }

    fn issue(tokens: &TokenService, payload: Value) -> String {
        tokens.issue(payload.as_object().cloned().unwrap()).unwrap()
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }

        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn message(body: &[u8]) -> String {
        let error: ErrorResponse = serde_json::from_slice(body).unwrap();
        assert!(error.error);
        error.message
    }

    #[tokio::test]
    async fn test_valid_token_passes_claims_to_handler() {
        let tokens = tokens();
        let token = issue(&tokens, json!({ "email": "a@x.com" }));

        let (status, body) = call(app(tokens), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"a@x.com");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, body) = call(app(tokens()), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Unauthorized access");
    }

    #[tokio::test]
    async fn test_header_without_token() {
        let (status, body) = call(app(tokens()), Some("Bearer".to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");
    }

    #[tokio::test]
    async fn test_forged_token() {
        let forger = TokenService::new(Some("someone-else"), Duration::hours(24));
        let token = issue(&forger, json!({ "email": "a@x.com" }));

        let (status, body) = call(app(tokens()), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");
    }

    #[tokio::test]
    async fn test_expired_token() {
        let expired = TokenService::new(Some("test-secret"), Duration::seconds(-5));
        let token = issue(&expired, json!({ "email": "a@x.com" }));

        let (status, body) = call(app(tokens()), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");
    }

    #[tokio::test]
    async fn test_token_without_email() {
        let tokens = tokens();
        let token = issue(&tokens, json!({ "name": "anonymous" }));

        let (status, body) = call(app(tokens), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token payload");
    }

    #[tokio::test]
    async fn test_unconfigured_secret_rejects_everything() {
        let signer = tokens();
        let token = issue(&signer, json!({ "email": "a@x.com" }));
        let unconfigured = Arc::new(TokenService::new(None, Duration::hours(24)));

        let (status, body) = call(app(unconfigured), Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Invalid token");
    }

    #[tokio::test]
    async fn test_claims_extractor_without_middleware() {
        let app = Router::new().route("/whoami", get(whoami));

        let (status, body) = call(app, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message(&body), "Unauthorized access");
    }
}
