//! Session handlers: OAuth callback, logout, verify, current user and the
//! authorization URL.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;

use crate::api::dto::{
    AuthorizeParams, AuthorizeResponse, CallbackRequest, CallbackResponse, LogoutResponse,
    VerifyResponse,
};
use crate::api::session::{SessionToken, cleared_session_cookie, session_cookie};
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};
use crate::threads::UserProfile;

/// `POST /api/auth/callback` — Exchange an authorization code.
///
/// # Errors
///
/// Returns [`AppError`] with status 400 if the code is missing, the
/// exchange fails, or the token response is incomplete.
#[utoipa::path(
    post,
    path = "/api/auth/callback",
    tag = "Auth",
    summary = "Exchange authorization code",
    description = "Exchanges the code for an access token, stores it, and sets the `threads_token` session cookie.",
    request_body = CallbackRequest,
    responses(
        (status = 200, description = "Authenticated; cookie set", body = CallbackResponse),
        (status = 400, description = "Exchange failed or invalid token response", body = ErrorResponse),
    )
)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<CallbackRequest>,
) -> Result<(CookieJar, Json<CallbackResponse>), AppError> {
    if req.code.trim().is_empty() {
        return Err(AppError::InvalidRequest("code is required".to_string()));
    }

    let login = state
        .auth_service
        .login(&req.code, &req.redirect_uri)
        .await?;

    let jar = jar.add(session_cookie(login.access_token, state.cookie_secure));
    Ok((
        jar,
        Json(CallbackResponse {
            success: true,
            user_id: login.user_id,
            username: login.profile.username,
            message: "Authentication successful".to_string(),
        }),
    ))
}

/// `POST /api/auth/logout` — Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Log out",
    responses(
        (status = 200, description = "Cookie cleared", body = LogoutResponse),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(cleared_session_cookie(state.cookie_secure)),
        Json(LogoutResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    )
}

/// `POST /api/auth/verify` — Check the session token against the Threads API.
///
/// # Errors
///
/// Returns [`AppError`] with status 401 if the cookie is missing or the
/// token is rejected.
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = "Auth",
    summary = "Verify session token",
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing or rejected token", body = ErrorResponse),
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<VerifyResponse>, AppError> {
    let user = state.auth_service.verify(&token).await?;
    Ok(Json(VerifyResponse {
        valid: true,
        user_id: user.user_id,
        username: user.username,
        access_token: token,
    }))
}

/// `GET /api/auth/user` — Current user's profile.
///
/// An upstream failure yields `{}` rather than an error.
///
/// # Errors
///
/// Returns [`AppError`] with status 401 if the cookie is missing.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = "Auth",
    summary = "Current user profile",
    responses(
        (status = 200, description = "Profile fields, or an empty object", body = serde_json::Value),
        (status = 401, description = "Missing token", body = ErrorResponse),
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Json<UserProfile> {
    Json(state.auth_service.profile_or_empty(&token).await)
}

/// `GET /api/auth/authorize` — Build the Threads authorization URL.
///
/// # Errors
///
/// Returns [`AppError`] with status 400 if no redirect URI is available.
#[utoipa::path(
    get,
    path = "/api/auth/authorize",
    tag = "Auth",
    summary = "Authorization URL",
    description = "Returns the Threads authorization dialog URL and a random CSRF state. The server does not keep the state.",
    params(AuthorizeParams),
    responses(
        (status = 200, description = "Authorization URL", body = AuthorizeResponse),
        (status = 400, description = "No redirect URI", body = ErrorResponse),
    )
)]
pub async fn authorize(
    State(state): State<AppState>,
    Query(params): Query<AuthorizeParams>,
) -> Result<Json<AuthorizeResponse>, AppError> {
    let req = state
        .auth_service
        .authorize_url(params.redirect_uri.as_deref(), &params.scopes())?;
    Ok(Json(AuthorizeResponse {
        url: req.url,
        state: req.state,
    }))
}

/// Auth routes, relative to `/api/auth`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/callback", post(callback))
        .route("/logout", post(logout))
        .route("/verify", post(verify))
        .route("/user", get(current_user))
        .route("/authorize", get(authorize))
}
