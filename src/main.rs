//! threadgems server entry point.
//!
//! Starts the Axum HTTP server with the OAuth session and proxy endpoints.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use threadgems::api;
use threadgems::app_state::AppState;
use threadgems::config::ServerConfig;
use threadgems::persistence;
use threadgems::service::AuthService;
use threadgems::telemetry;
use threadgems::threads::{ClientCredentials, ThreadsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;
    telemetry::init(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting threadgems");

    // Build infrastructure
    let store = persistence::connect_optional(config.database.as_ref()).await;
    let client = ThreadsClient::new(&config.api)?;

    // Build service layer
    let auth_service = Arc::new(AuthService::new(
        client,
        ClientCredentials {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        },
        config.auth_base_url.clone(),
        config.redirect_uri.clone(),
        store,
    ));

    // Build application state
    let app_state = AppState {
        auth_service,
        cookie_secure: config.cookie_secure,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Credentialed CORS for the configured front-end origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
}
