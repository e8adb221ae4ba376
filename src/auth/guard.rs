//! Session guard for protected routes.
//!
//! Resolves the `sessionID` cookie through the session store and attaches a
//! typed [`Principal`] to the request extensions. Handlers behind the guard
//! extract it with `Extension<Principal>` and never touch the cookie.

use crate::auth::error::AuthError;
use crate::auth::AuthService;
use crate::store::ephemeral::EphemeralStore;
use axum::{
    extract::Request,
    http::{
        header::{InvalidHeaderValue, COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "sessionID";

/// Identity resolved from a session cookie, scoped to one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
}

/// Resolve the session cookie in `headers` into a [`Principal`].
///
/// # Errors
///
/// `Unauthenticated` when the cookie is missing, the session expired, or the
/// store lookup failed; `InvalidSessionData` when the stored value is not a
/// user id
pub async fn authenticate(
    headers: &HeaderMap,
    sessions: &dyn EphemeralStore,
) -> Result<Principal, AuthError> {
    let Some(token) = extract_session_cookie(headers) else {
        return Err(AuthError::Unauthenticated);
    };

    let value = match sessions.get(&token).await {
        Ok(Some(value)) => value,
        Ok(None) => return Err(AuthError::Unauthenticated),
        Err(err) => {
            // Store errors deny access rather than failing open.
            error!("session lookup failed: {err}");
            return Err(AuthError::Unauthenticated);
        }
    };

    match Uuid::parse_str(&value) {
        Ok(user_id) => Ok(Principal { user_id }),
        Err(_) => {
            warn!("session resolved to a malformed user id");
            Err(AuthError::InvalidSessionData)
        }
    }
}

/// Middleware wrapping protected routes: 401 or pass-through with a
/// [`Principal`] attached.
pub async fn session_middleware(
    Extension(auth): Extension<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(request.headers(), auth.sessions()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(AuthError::InvalidSessionData) => {
            (StatusCode::UNAUTHORIZED, "Invalid session data").into_response()
        }
        Err(_) => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

/// Build the `Set-Cookie` value for a freshly minted session token.
///
/// # Errors
///
/// Returns an error if the token produces an invalid header value
pub fn session_cookie(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = crate::auth::SESSION_TTL.as_secs();

    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age}"
    ))
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ephemeral::MemoryStore;
    use std::time::Duration;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_session_cookie() {
        let headers = headers_with_cookie("sessionID=abc123");
        assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));

        let headers = headers_with_cookie("theme=dark; sessionID=abc123; lang=en");
        assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));

        let headers = headers_with_cookie("theme=dark");
        assert_eq!(extract_session_cookie(&headers), None);

        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123").unwrap();
        let cookie = cookie.to_str().unwrap();

        assert!(cookie.starts_with("sessionID=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[tokio::test]
    async fn test_authenticate_missing_cookie() {
        let sessions = MemoryStore::new();

        let err = authenticate(&HeaderMap::new(), &sessions).await.unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let sessions = MemoryStore::new();
        let headers = headers_with_cookie("sessionID=deadbeef");

        let err = authenticate(&headers, &sessions).await.unwrap_err();

        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_session_value() {
        let sessions = MemoryStore::new();
        sessions
            .set("deadbeef", "not-a-uuid", Duration::from_secs(60))
            .await
            .unwrap();
        let headers = headers_with_cookie("sessionID=deadbeef");

        let err = authenticate(&headers, &sessions).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidSessionData));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let sessions = MemoryStore::new();
        let user_id = Uuid::new_v4();
        sessions
            .set("deadbeef", &user_id.to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let headers = headers_with_cookie("sessionID=deadbeef");

        let principal = authenticate(&headers, &sessions).await.unwrap();

        assert_eq!(principal, Principal { user_id });
    }
}
