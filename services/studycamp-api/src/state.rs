//! API state management
//!
//! The application context built once at startup and handed to every
//! handler through axum's `State` extractor.

use axum::extract::FromRef;
use std::sync::Arc;
use studycamp_storage::DocumentStore;

use crate::token::TokenService;

/// Shared application state for the API server
#[derive(Clone)]
pub struct AppState {
    /// Document store, one client for the whole process
    pub store: Arc<dyn DocumentStore>,
    /// Session token signer/verifier
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}
