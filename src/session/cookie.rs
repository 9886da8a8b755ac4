//! Session id cookie handling
//!
//! Only the session id travels to the browser; the data stays server-side in
//! the session store. These helpers build the Set-Cookie values and pull the
//! id back out of request headers.

use crate::session::SessionConfig;
use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};

/// Build the cookie that hands a session id to the browser.
pub fn session_cookie(config: &SessionConfig, session_id: impl Into<String>) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.cookie_name.clone(), session_id.into());
    cookie.set_path(config.cookie_path.clone());
    cookie.set_http_only(config.cookie_http_only);
    cookie.set_secure(config.cookie_secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(cookie::time::Duration::seconds(
        config.default_ttl_seconds as i64,
    ));
    cookie
}

/// Build the cookie that clears the session id on logout.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.cookie_name.clone(), "");
    cookie.set_path(config.cookie_path.clone());
    cookie.set_http_only(config.cookie_http_only);
    cookie.set_max_age(cookie::time::Duration::ZERO);
    cookie
}

/// Extract the session id from request Cookie headers, if present.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for cookie in Cookie::split_parse(raw.to_owned()).flatten() {
            if cookie.name() == cookie_name {
                return Some(cookie.value().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig::default();
        let cookie = session_cookie(&config, "abc-123");

        assert_eq!(cookie.name(), "dugout_session");
        assert_eq!(cookie.value(), "abc-123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let config = SessionConfig::default();
        let cookie = removal_cookie(&config);

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
    }

    #[test]
    fn test_session_id_extracted_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("other=1; dugout_session=abc-123; theme=dark"),
        );

        let id = session_id_from_headers(&headers, "dugout_session");
        assert_eq!(id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let headers = HeaderMap::new();
        assert!(session_id_from_headers(&headers, "dugout_session").is_none());
    }
}
