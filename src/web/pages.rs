//! Landing page and the logged-in daily report.

use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::Duration;
use serde_json::json;

use crate::app::AppContext;
use crate::error::Result;
use crate::http::routes::RouteModule;
use crate::stats::display_date;
use crate::web::extract::CurrentUser;
use crate::web::session::PageSession;
use crate::web::Page;

/// Public landing page plus the report page behind login.
pub struct PagesModule;

impl RouteModule for PagesModule {
    fn routes(&self) -> Router<AppContext> {
        Router::new()
            .route("/", get(index))
            .route("/today", get(today))
    }
}

async fn index(State(ctx): State<AppContext>, mut session: PageSession) -> Result<Response> {
    let page = Page::new("index", &ctx, &mut session).render(&ctx)?;
    session.commit(&ctx, page).await
}

/// Yesterday's box scores alongside today's probables, standings and league
/// leaders. Dates are anchored to the display timezone, so the page rolls
/// over at local midnight.
async fn today(State(ctx): State<AppContext>, current: CurrentUser) -> Result<Response> {
    let mut session = current.session;

    let today = ctx.reports.local_today();
    let yesterday = today - Duration::days(1);

    let boxscores = ctx.reports.boxscores_for_date(yesterday).await?;
    let probables = ctx.reports.probables_for_date(today).await?;
    let standings = ctx.reports.standings().await?;
    let leaders = ctx.reports.league_leaders().await?;

    let page = Page::new("today", &ctx, &mut session)
        .insert("today", json!(display_date(today)))
        .insert("yesterday", json!(display_date(yesterday)))
        .insert("boxscores", json!(boxscores))
        .insert("probables", json!(probables))
        .insert("standings", json!(standings))
        .insert("leaders", json!(leaders))
        .render(&ctx)?;

    session.commit(&ctx, page).await
}
