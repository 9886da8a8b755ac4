use std::sync::Arc;

use crate::config::Config;
use crate::render::Renderer;
use crate::stats::ReportBuilder;
use crate::store::{SettingsStore, UserStore};
use crate::traits::job::JobQueue;
use crate::traits::mailer::Mailer;
use crate::traits::session::SessionStore;

/// Application context for dependency injection and shared state
///
/// Every handler and background job receives this. All dependencies sit
/// behind traits (or cheap handles) so tests can substitute in-memory stores
/// and recording mailers for the real backends.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,

    /// User accounts: login, recipients, admin flags.
    pub users: Arc<dyn UserStore>,

    /// The stored outbound-mail configuration edited via the config form.
    pub settings: Arc<dyn SettingsStore>,

    /// Server-side session data addressed by the cookie's session id.
    pub sessions: Arc<dyn SessionStore>,

    /// Outbound mail backend.
    pub mailer: Arc<dyn Mailer>,

    /// Assembles box scores, probables, standings, leaders and transactions.
    pub reports: Arc<ReportBuilder>,

    /// Handlebars template registry.
    pub renderer: Arc<Renderer>,

    /// Queue the daily digest job is booked on.
    pub jobs: Arc<dyn JobQueue>,
}

impl AppContext {
    /// Builder pattern for constructing AppContext
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

/// Builder for AppContext with fluent API
///
/// `build()` fails when a dependency was never supplied; nothing here is
/// optional at runtime.
#[must_use = "builder does nothing until you call build()"]
pub struct AppContextBuilder {
    config: Option<Arc<Config>>,
    users: Option<Arc<dyn UserStore>>,
    settings: Option<Arc<dyn SettingsStore>>,
    sessions: Option<Arc<dyn SessionStore>>,
    mailer: Option<Arc<dyn Mailer>>,
    reports: Option<Arc<ReportBuilder>>,
    renderer: Option<Arc<Renderer>>,
    jobs: Option<Arc<dyn JobQueue>>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            users: None,
            settings: None,
            sessions: None,
            mailer: None,
            reports: None,
            renderer: None,
            jobs: None,
        }
    }

    pub fn with_config(mut self, config: Arc<Config>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_sessions(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_reports(mut self, reports: Arc<ReportBuilder>) -> Self {
        self.reports = Some(reports);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_job_queue(mut self, jobs: Arc<dyn JobQueue>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn build(self) -> crate::error::Result<AppContext> {
        Ok(AppContext {
            config: require(self.config, "config")?,
            users: require(self.users, "user store")?,
            settings: require(self.settings, "settings store")?,
            sessions: require(self.sessions, "session store")?,
            mailer: require(self.mailer, "mailer")?,
            reports: require(self.reports, "report builder")?,
            renderer: require(self.renderer, "renderer")?,
            jobs: require(self.jobs, "job queue")?,
        })
    }
}

fn require<T>(value: Option<T>, name: &str) -> crate::error::Result<T> {
    value
        .ok_or_else(|| crate::error::DugoutError::config(format!("AppContext is missing a {}", name)))
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
