//! Browser-facing pages: landing, login, the daily report, and mail settings.

pub mod auth;
pub mod extract;
pub mod flash;
pub mod pages;
pub mod session;
pub mod settings;

pub use auth::AuthModule;
pub use extract::{AdminUser, CurrentUser};
pub use flash::Flash;
pub use pages::PagesModule;
pub use session::PageSession;
pub use settings::SettingsModule;

use axum::response::Html;
use serde_json::{Map, Value};

use crate::app::AppContext;
use crate::error::Result;

/// Context builder for page templates.
///
/// Every page shares a header that expects `title`, `logged_in` and
/// `flashes`, so the constructor fills those in (draining the session's
/// pending flashes) and handlers add their own keys on top.
pub(crate) struct Page {
    name: &'static str,
    context: Map<String, Value>,
}

impl Page {
    pub(crate) fn new(name: &'static str, ctx: &AppContext, session: &mut PageSession) -> Self {
        let flashes = session.take_flashes();
        let mut context = Map::new();
        context.insert(
            "title".to_string(),
            Value::String(ctx.config.site.title.clone()),
        );
        context.insert(
            "logged_in".to_string(),
            Value::Bool(session.user_id().is_some()),
        );
        context.insert("flashes".to_string(), serde_json::json!(flashes));
        Self { name, context }
    }

    #[must_use]
    pub(crate) fn insert(mut self, key: &str, value: Value) -> Self {
        self.context.insert(key.to_string(), value);
        self
    }

    pub(crate) fn render(self, ctx: &AppContext) -> Result<Html<String>> {
        let html = ctx.renderer.render(self.name, &self.context)?;
        Ok(Html(html))
    }
}

// ============================================================================
// Page context tests
// ============================================================================
