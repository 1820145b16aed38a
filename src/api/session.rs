//! Session token transport: reading it off requests, writing it as a cookie.
//!
//! Handlers receive the token as a [`SessionToken`] and hand it to the
//! services explicitly.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::sync::Arc;
use tower_sessions::cookie::{Cookie, SameSite};

use super::AppState;
use crate::config::ServerConfig;

/// The token presented with a request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<Arc<AppState>> for SessionToken {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(extract_token(
            &parts.headers,
            &state.config.server.session_cookie_name,
        )))
    }
}

/// Checks, in order:
/// 1. the session cookie
/// 2. `Authorization: Bearer <token>`
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };

        if let Some(cookie) = Cookie::split_parse(raw)
            .flatten()
            .find(|c| c.name() == cookie_name && !c.value().is_empty())
        {
            return Some(cookie.value().to_string());
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    None
}

/// `Set-Cookie` value carrying a freshly issued token. `Max-Age` runs out
/// together with the session row.
pub fn session_cookie(
    config: &ServerConfig,
    token: &str,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<HeaderValue> {
    let remaining = (expires_at - now).num_seconds().max(0);

    let cookie = Cookie::build((config.session_cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(remaining))
        .build();

    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn removal_cookie(config: &ServerConfig) -> Option<HeaderValue> {
    let cookie = Cookie::build((config.session_cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::ZERO)
        .build();

    HeaderValue::from_str(&cookie.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_from_cookie() {
        let h = headers(&[(header::COOKIE, "theme=dark; session_id=abc-123; other=1")]);
        assert_eq!(extract_token(&h, "session_id").as_deref(), Some("abc-123"));
        assert_eq!(extract_token(&h, "sid"), None);
    }

    #[test]
    fn test_extract_skips_empty_cookie() {
        let h = headers(&[(header::COOKIE, "session_id=")]);
        assert_eq!(extract_token(&h, "session_id"), None);
    }

    #[test]
    fn test_extract_from_bearer() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer tok-456")]);
        assert_eq!(extract_token(&h, "session_id").as_deref(), Some("tok-456"));

        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&h, "session_id"), None);
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let h = headers(&[
            (header::COOKIE, "session_id=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(
            extract_token(&h, "session_id").as_deref(),
            Some("from-cookie")
        );
    }

    fn issued_now() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now + chrono::Duration::days(constants::session::LIFETIME_DAYS), now)
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = ServerConfig::default();
        let (expires_at, now) = issued_now();
        let value = session_cookie(&config, "tok", expires_at, now).unwrap();
        let value = value.to_str().unwrap();

        assert!(value.starts_with("session_id=tok"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Max-Age=604800"));
        assert!(!value.contains("Secure"));

        let secure = ServerConfig {
            secure_cookies: true,
            ..ServerConfig::default()
        };
        assert!(
            session_cookie(&secure, "tok", expires_at, now)
                .unwrap()
                .to_str()
                .unwrap()
                .contains("Secure")
        );
    }

    #[test]
    fn test_max_age_follows_expiry() {
        let config = ServerConfig::default();
        let now = Utc::now();

        let value = session_cookie(&config, "tok", now + chrono::Duration::hours(1), now).unwrap();
        assert!(value.to_str().unwrap().contains("Max-Age=3600"));

        let value = session_cookie(&config, "tok", now - chrono::Duration::hours(1), now).unwrap();
        assert!(value.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_removal_cookie() {
        let value = removal_cookie(&ServerConfig::default()).unwrap();
        let value = value.to_str().unwrap();

        assert!(value.starts_with("session_id=;"));
        assert!(value.contains("Max-Age=0"));
    }
}
