//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::AuthService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Auth service for the session endpoints.
    pub auth_service: Arc<AuthService>,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}
