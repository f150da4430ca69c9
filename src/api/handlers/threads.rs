//! Authenticated Threads API proxy.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ProfilePostsParams;
use crate::api::session::SessionToken;
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `GET /api/threads/profile/{username}` — Posts of a profile, fetched with
/// the caller's token.
///
/// The upstream JSON body is returned unchanged.
///
/// # Errors
///
/// Returns [`AppError`] with status 401 if the cookie is missing, or 502 if
/// the Threads API call fails.
#[utoipa::path(
    get,
    path = "/api/threads/profile/{username}",
    tag = "Threads",
    summary = "Profile posts",
    params(
        ("username" = String, Path, description = "Threads handle"),
        ProfilePostsParams,
    ),
    responses(
        (status = 200, description = "Upstream posts page", body = serde_json::Value),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 502, description = "Threads API failure", body = ErrorResponse),
    )
)]
pub async fn profile_posts(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    Path(username): Path<String>,
    Query(params): Query<ProfilePostsParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let body = state
        .auth_service
        .profile_posts(&token, &username, params.limit)
        .await?;
    Ok(Json(body))
}

/// Threads routes, relative to `/api/threads`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile/{username}", get(profile_posts))
}
