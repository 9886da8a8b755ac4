//! Login and logout routes.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;

use crate::app::AppContext;
use crate::auth::PasswordHasher;
use crate::error::Result;
use crate::http::routes::RouteModule;
use crate::session::cookie::removal_cookie;
use crate::web::flash::Flash;
use crate::web::session::{cookie_header, PageSession};
use crate::web::Page;

/// Login form and logout endpoint.
pub struct AuthModule;

impl RouteModule for AuthModule {
    fn routes(&self) -> Router<AppContext> {
        Router::new()
            .route("/login", get(login_form).post(submit_login))
            .route("/logout", post(logout))
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn login_form(State(ctx): State<AppContext>, mut session: PageSession) -> Result<Response> {
    let page = Page::new("login", &ctx, &mut session)
        .insert("email", json!(""))
        .render(&ctx)?;
    session.commit(&ctx, page).await
}

/// Checks credentials and starts a logged-in session.
///
/// The session id is rotated on success so the authenticated session never
/// reuses an id that existed before login. Failures re-render the form with
/// one generic message whether the address or the password was wrong.
async fn submit_login(
    State(ctx): State<AppContext>,
    mut session: PageSession,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = ctx.users.find_by_email(&form.email).await?;
    let verified = match &user {
        Some(user) => PasswordHasher::default().verify(&form.password, &user.password_hash)?,
        None => false,
    };

    if let Some(user) = user.filter(|_| verified) {
        tracing::info!(user_id = user.id, "User logged in");
        session.rotate();
        session.log_in(user.id);
        return session.commit(&ctx, Redirect::to("/today")).await;
    }

    session.flash(Flash::danger("Invalid email or password."));
    let page = Page::new("login", &ctx, &mut session)
        .insert("email", json!(form.email))
        .render(&ctx)?;
    session.commit(&ctx, page).await
}

/// Drops the server-side session and clears the cookie.
async fn logout(State(ctx): State<AppContext>, session: PageSession) -> Result<Response> {
    ctx.sessions.delete(session.id()).await?;

    let cookie = removal_cookie(&ctx.config.session);
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, cookie_header(&cookie)?);
    Ok(response)
}
