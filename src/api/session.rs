//! Session cookie handling.
//!
//! The access token lives in an `HttpOnly` cookie so browser scripts never
//! see it. Handlers that need it take a [`SessionToken`] argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;

/// Name of the session cookie.
pub const COOKIE_NAME: &str = "threads_token";

/// Cookie lifetime in days.
pub const COOKIE_MAX_AGE_DAYS: i64 = 30;

/// Builds the session cookie carrying `access_token`.
#[must_use]
pub fn session_cookie(access_token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, access_token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
        .build()
}

/// Expired session cookie, sent whether or not the request carried one.
#[must_use]
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Access token read from the session cookie.
///
/// Rejects with `401` when the cookie is missing or empty.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        CookieJar::from_headers(&parts.headers)
            .get(COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .map(SessionToken)
            .ok_or(AppError::Unauthenticated("No access token found"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), true);
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("threads_token=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=2592000"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let rendered = cleared_session_cookie(true).to_string();
        assert!(rendered.starts_with("threads_token=;"));
        assert!(rendered.contains("Max-Age=0"));
        assert!(rendered.contains("Path=/"));
    }

    #[test]
    fn insecure_cookie_omits_secure() {
        let rendered = session_cookie("tok".to_string(), false).to_string();
        assert!(!rendered.contains("Secure"));
    }

    #[tokio::test]
    async fn extracts_token_from_cookie_header() {
        let Ok(req) = Request::builder()
            .header("cookie", "other=1; threads_token=abc")
            .body(())
        else {
            panic!("request");
        };
        let (mut parts, ()) = req.into_parts();
        let Ok(SessionToken(token)) = SessionToken::from_request_parts(&mut parts, &()).await
        else {
            panic!("token expected");
        };
        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthenticated() {
        let Ok(req) = Request::builder().body(()) else {
            panic!("request");
        };
        let (mut parts, ()) = req.into_parts();
        let result = SessionToken::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
