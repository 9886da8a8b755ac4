//! Mail configuration pages.
//!
//! Admin-only CRUD over the single outbound-mail settings row. The add form
//! refuses to create a second row and sends the admin to the existing one
//! instead; the edit form falls back to the add form when nothing is stored
//! yet.

use axum::extract::State;
use axum::response::{Html, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::{Validate, ValidationErrors};

use crate::app::AppContext;
use crate::error::Result;
use crate::http::routes::RouteModule;
use crate::store::{MailSettings, MailSettingsInput};
use crate::web::extract::AdminUser;
use crate::web::flash::Flash;
use crate::web::session::PageSession;
use crate::web::Page;

const ADD_HEADING: &str = "Add Mail Configuration";
const EDIT_HEADING: &str = "Edit Mail Configuration";

/// Admin pages for viewing and editing the outbound mail settings.
pub struct SettingsModule;

impl RouteModule for SettingsModule {
    fn routes(&self) -> Router<AppContext> {
        Router::new()
            .route("/config", get(show_config))
            .route("/config/add", get(add_form).post(submit_add))
            .route("/config/edit", get(edit_form).post(submit_edit))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
struct ConfigForm {
    #[validate(length(min = 1, message = "is required"))]
    username: String,
    #[validate(length(min = 1, message = "is required"))]
    password: String,
    #[validate(email(message = "must be a valid email address"))]
    from_email: String,
    #[validate(length(min = 1, message = "is required"))]
    smtp_host: String,
    #[validate(range(min = 1, message = "must be between 1 and 65535"))]
    port: u16,
    #[serde(default, deserialize_with = "checkbox")]
    ssl: bool,
}

impl ConfigForm {
    fn into_input(self) -> MailSettingsInput {
        MailSettingsInput {
            username: self.username,
            password: self.password,
            from_email: self.from_email,
            smtp_host: self.smtp_host,
            port: self.port,
            ssl: self.ssl,
        }
    }
}

/// Browsers submit a checkbox value only when checked; absence means false.
fn checkbox<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.is_some())
}

/// One "field: message" line per failed rule, sorted so flash order is stable.
fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages
}

fn blank_form() -> Value {
    json!({
        "username": "",
        "password": "",
        "from_email": "",
        "smtp_host": "",
        "port": "",
        "ssl": false,
    })
}

fn prefilled_form(settings: &MailSettings) -> Value {
    json!({
        "username": settings.username,
        "password": settings.password,
        "from_email": settings.from_email,
        "smtp_host": settings.smtp_host,
        "port": settings.port,
        "ssl": settings.ssl,
    })
}

fn render_form(
    ctx: &AppContext,
    session: &mut PageSession,
    heading: &str,
    action: &str,
    form: Value,
) -> Result<Html<String>> {
    Page::new("config_form", ctx, session)
        .insert("heading", json!(heading))
        .insert("action", json!(action))
        .insert("form", form)
        .render(ctx)
}

async fn show_config(State(ctx): State<AppContext>, admin: AdminUser) -> Result<Response> {
    let mut session = admin.session;

    let Some(settings) = ctx.settings.first_settings().await? else {
        session.flash(Flash::danger("Site config not found."));
        return session.commit(&ctx, Redirect::to("/config/add")).await;
    };

    let page = Page::new("config", &ctx, &mut session)
        .insert("settings", json!(settings))
        .render(&ctx)?;
    session.commit(&ctx, page).await
}

async fn add_form(State(ctx): State<AppContext>, admin: AdminUser) -> Result<Response> {
    let mut session = admin.session;

    if ctx.settings.any_settings().await? {
        session.flash(Flash::danger("Site config already exists."));
        return session.commit(&ctx, Redirect::to("/config")).await;
    }

    let page = render_form(&ctx, &mut session, ADD_HEADING, "/config/add", blank_form())?;
    session.commit(&ctx, page).await
}

async fn submit_add(
    State(ctx): State<AppContext>,
    admin: AdminUser,
    Form(form): Form<ConfigForm>,
) -> Result<Response> {
    let mut session = admin.session;

    if ctx.settings.any_settings().await? {
        session.flash(Flash::danger("Site config already exists."));
        return session.commit(&ctx, Redirect::to("/config")).await;
    }

    if let Err(errors) = form.validate() {
        for message in validation_messages(&errors) {
            session.flash(Flash::danger(message));
        }
        let page = render_form(&ctx, &mut session, ADD_HEADING, "/config/add", json!(form))?;
        return session.commit(&ctx, page).await;
    }

    let settings = ctx.settings.insert_settings(form.into_input()).await?;
    tracing::info!(settings_id = settings.id, "Mail configuration added");

    session.flash(Flash::success("Site config added successfully."));
    session.commit(&ctx, Redirect::to("/config")).await
}

async fn edit_form(State(ctx): State<AppContext>, admin: AdminUser) -> Result<Response> {
    let mut session = admin.session;

    let Some(settings) = ctx.settings.first_settings().await? else {
        session.flash(Flash::danger("Site config not found."));
        return session.commit(&ctx, Redirect::to("/config/add")).await;
    };

    let page = render_form(
        &ctx,
        &mut session,
        EDIT_HEADING,
        "/config/edit",
        prefilled_form(&settings),
    )?;
    session.commit(&ctx, page).await
}

/// Applies the edit and shows the config view with the updated row, matching
/// the add flow's landing page without the extra round trip.
async fn submit_edit(
    State(ctx): State<AppContext>,
    admin: AdminUser,
    Form(form): Form<ConfigForm>,
) -> Result<Response> {
    let mut session = admin.session;

    if let Err(errors) = form.validate() {
        for message in validation_messages(&errors) {
            session.flash(Flash::danger(message));
        }
        let page = render_form(&ctx, &mut session, EDIT_HEADING, "/config/edit", json!(form))?;
        return session.commit(&ctx, page).await;
    }

    let Some(settings) = ctx.settings.update_first_settings(form.into_input()).await? else {
        session.flash(Flash::danger("Site config not found."));
        return session.commit(&ctx, Redirect::to("/config/add")).await;
    };

    tracing::info!(settings_id = settings.id, "Mail configuration updated");

    session.flash(Flash::success("Site config updated successfully."));
    let page = Page::new("config", &ctx, &mut session)
        .insert("settings", json!(settings))
        .render(&ctx)?;
    session.commit(&ctx, page).await
}

// ============================================================================
// Config form tests
// ============================================================================
