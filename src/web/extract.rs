//! Authentication extractors
//!
//! [`CurrentUser`] gates pages behind login: anonymous requests are redirected
//! to the login form with a flash. [`AdminUser`] additionally requires the
//! admin flag and rejects with 403 for signed-in non-admins.

use std::future::Future;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use crate::app::AppContext;
use crate::error::DugoutError;
use crate::store::User;
use crate::web::flash::Flash;
use crate::web::session::PageSession;

/// The logged-in user plus the session the id came from.
pub struct CurrentUser {
    pub user: User,
    pub session: PageSession,
}

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> impl Future<Output = std::result::Result<Self, Self::Rejection>> + Send {
        Box::pin(async move {
            let session =
                <PageSession as FromRequestParts<AppContext>>::from_request_parts(parts, state)
                    .await
                    .map_err(IntoResponse::into_response)?;

            let Some(user_id) = session.user_id() else {
                return Err(login_redirect(state, session).await);
            };

            match state.users.find_by_id(user_id).await {
                Ok(Some(user)) => Ok(Self { user, session }),
                Ok(None) => {
                    // Session points at an account that no longer exists
                    let mut session = session;
                    session.log_out();
                    Err(login_redirect(state, session).await)
                }
                Err(error) => Err(error.into_response()),
            }
        })
    }
}

/// A logged-in user with the admin flag set.
pub struct AdminUser {
    pub user: User,
    pub session: PageSession,
}

impl FromRequestParts<AppContext> for AdminUser {
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> impl Future<Output = std::result::Result<Self, Self::Rejection>> + Send {
        Box::pin(async move {
            let current =
                <CurrentUser as FromRequestParts<AppContext>>::from_request_parts(parts, state)
                    .await?;

            if !current.user.admin {
                return Err(DugoutError::forbidden(
                    "Administrator access is required",
                )
                .into_response());
            }

            Ok(Self {
                user: current.user,
                session: current.session,
            })
        })
    }
}

async fn login_redirect(ctx: &AppContext, mut session: PageSession) -> Response {
    session.flash(Flash::danger("Please log in to access this page."));
    match session.commit(ctx, Redirect::to("/login")).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
    }
}
