//! Per-request session handle
//!
//! [`PageSession`] is the extractor page handlers use: it resolves the
//! session cookie against the session store, exposes the logged-in user id
//! and flash messages, and writes everything back (setting the cookie for
//! fresh sessions) when the handler commits its response.

use std::future::Future;
use std::time::Duration;

use axum::http::{header, request::Parts, HeaderValue};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::app::AppContext;
use crate::error::{DugoutError, Result};
use crate::session::cookie::{session_cookie, session_id_from_headers};
use crate::traits::session::SessionData;
use crate::web::flash::{push_flash, take_flashes, Flash};

const USER_ID_KEY: &str = "user_id";

/// The request's session: existing data loaded from the store, or a fresh
/// unsaved session when the browser sent no (valid) cookie.
pub struct PageSession {
    id: String,
    data: SessionData,
    is_new: bool,
}

impl PageSession {
    fn fresh(ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data: SessionData::new(ttl),
            is_new: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_tests() -> Self {
        Self::fresh(Duration::from_secs(60))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The logged-in user id, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.data.get(USER_ID_KEY)?.parse().ok()
    }

    pub fn log_in(&mut self, user_id: i64) {
        self.data.set(USER_ID_KEY.to_string(), user_id.to_string());
    }

    pub fn log_out(&mut self) {
        self.data.remove(USER_ID_KEY);
    }

    /// Swap in a fresh session id, leaving the data intact. Used on login so
    /// the authenticated session never reuses a pre-login id.
    pub fn rotate(&mut self) {
        self.id = Uuid::new_v4().to_string();
        self.is_new = true;
    }

    pub fn flash(&mut self, flash: Flash) {
        push_flash(&mut self.data, flash);
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        take_flashes(&mut self.data)
    }

    fn carries_anything(&self) -> bool {
        !self.data.data.is_empty()
    }

    /// Persist the session and attach it to the response.
    ///
    /// A fresh session that never picked up any data is dropped without a
    /// store write or a cookie, so anonymous page views stay stateless.
    pub async fn commit(
        self,
        ctx: &AppContext,
        response: impl IntoResponse,
    ) -> Result<Response> {
        let mut response = response.into_response();

        if !self.is_new || self.carries_anything() {
            if self.is_new {
                let cookie = session_cookie(&ctx.config.session, self.id.clone());
                response
                    .headers_mut()
                    .append(header::SET_COOKIE, cookie_header(&cookie)?);
            }
            ctx.sessions.save(&self.id, self.data).await?;
        }

        Ok(response)
    }
}

/// A cookie as a Set-Cookie header value.
pub(crate) fn cookie_header(cookie: &cookie::Cookie<'_>) -> Result<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|_| DugoutError::internal("Session cookie is not a valid header value"))
}

impl axum::extract::FromRequestParts<AppContext> for PageSession {
    type Rejection = DugoutError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> impl Future<Output = std::result::Result<Self, Self::Rejection>> + Send {
        Box::pin(async move {
            let config = &state.config.session;

            if let Some(id) = session_id_from_headers(&parts.headers, &config.cookie_name) {
                if let Some(data) = state.sessions.load(&id).await? {
                    return Ok(Self {
                        id,
                        data,
                        is_new: false,
                    });
                }
            }

            Ok(Self::fresh(config.default_ttl()))
        })
    }
}

// ============================================================================
// Page session tests
// ============================================================================
