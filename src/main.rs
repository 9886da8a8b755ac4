//! Entry point: load configuration, wire the application, and serve.

use std::sync::Arc;

use dugout::auth::PasswordHasher;
use dugout::jobs::{InMemoryJobQueue, JobRegistry};
use dugout::mailer::SmtpMailer;
use dugout::render::Renderer;
use dugout::session::InMemorySessionStore;
use dugout::stats::{MlbApiClient, ReportBuilder};
use dugout::store::{MemoryStore, NewUser};
use dugout::web::{AuthModule, PagesModule, SettingsModule};
use dugout::{App, AppContext, Config, ConfigBuilder, DugoutError, Result};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(ConfigBuilder::new().from_env().build()?);
    dugout::init_tracing_with_config(&config);

    let context = build_context(config.clone())?;
    bootstrap_admin(&context, &config).await?;

    let registry = JobRegistry::new();
    dugout::digest::register_daily_digest(&registry).await;

    App::new(context)
        .register_module(PagesModule)
        .register_module(AuthModule)
        .register_module(SettingsModule)
        .start_workers(Arc::new(registry))
        .start_daily_digest()
        .serve()
        .await?;

    Ok(())
}

/// Wire the stores, stats client, renderer and job queue into an [`AppContext`].
fn build_context(config: Arc<Config>) -> Result<AppContext> {
    let tz = config
        .stats
        .tz()
        .ok_or_else(|| DugoutError::config("unknown report timezone"))?;

    let store = Arc::new(MemoryStore::new());
    let api = Arc::new(MlbApiClient::new(config.stats.base_url.clone())?);

    AppContext::builder()
        .with_config(config.clone())
        .with_users(store.clone())
        .with_settings(store.clone())
        .with_sessions(Arc::new(InMemorySessionStore::new(
            config.session.default_ttl(),
        )))
        .with_mailer(Arc::new(SmtpMailer::new(store)))
        .with_reports(Arc::new(ReportBuilder::new(api, tz)))
        .with_renderer(Arc::new(Renderer::new()?))
        .with_job_queue(Arc::new(InMemoryJobQueue::new(
            config.jobs.max_retries,
            config.jobs.retry_backoff_seconds,
        )))
        .build()
}

/// Seed the configured admin account if it does not exist yet.
///
/// The in-memory store starts empty on every boot, so without this there
/// would be no way to log in and reach the mail settings form.
async fn bootstrap_admin(context: &AppContext, config: &Config) -> Result<()> {
    let (Some(email), Some(password)) = (
        config.bootstrap.admin_email.as_deref(),
        config.bootstrap.admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if context.users.find_by_email(email).await?.is_some() {
        tracing::debug!(email, "Bootstrap admin already present");
        return Ok(());
    }

    let password_hash = PasswordHasher::default().hash(password)?;
    context
        .users
        .create_user(NewUser {
            email: email.to_string(),
            password_hash,
            active: true,
            admin: true,
        })
        .await?;

    tracing::info!(email, "Bootstrap admin account created");
    Ok(())
}
