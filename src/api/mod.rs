//! REST API layer: route handlers, DTOs, session cookies, and router
//! composition.
//!
//! Session and proxy endpoints are mounted under `/api`; `/health` sits at
//! the root.

pub mod dto;
pub mod handlers;
pub mod session;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "threadgems", description = "Threads OAuth backend and design-thread curation"),
    paths(
        handlers::auth::callback,
        handlers::auth::logout,
        handlers::auth::verify,
        handlers::auth::current_user,
        handlers::auth::authorize,
        handlers::threads::profile_posts,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::CallbackRequest,
        dto::CallbackResponse,
        dto::LogoutResponse,
        dto::VerifyResponse,
        dto::AuthorizeResponse,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Auth", description = "OAuth callback and session cookie"),
        (name = "Threads", description = "Authenticated Threads API proxy"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
