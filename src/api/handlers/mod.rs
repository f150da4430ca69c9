//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod system;
pub mod threads;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/threads", threads::routes())
}
