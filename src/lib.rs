//! Dugout - the daily MLB report, on the web and in your inbox
//!
//! Dugout pulls yesterday's box scores, today's probable pitchers, the
//! division standings, league leaders and roster transactions from the
//! MLB Stats API, serves them as a small website, and mails the same
//! report to every subscribed user each morning as an HTML digest.
//!
//! # Features
//!
//! - **Web**: Axum-served pages for the report, login, and mail settings
//! - **Digest**: a background job that composes and mails the daily report
//! - **Stats**: a typed MLB Stats API client and report assembly
//! - **Jobs**: in-memory queue, worker pool, and a daily scheduler
//! - **Sessions**: cookie sessions with server-side state and flash messages
//! - **Testing**: Alba-style HTTP testing utilities and canned stats fixtures
//!
//! # Quick Start
//!
//! The `dugout` binary wires the stores, stats client, renderer and job
//! queue into an [`AppContext`]; serving it is then:
//!
//! ```rust,no_run
//! use dugout::web::{AuthModule, PagesModule, SettingsModule};
//! use dugout::{App, AppContext};
//!
//! # async fn run(context: AppContext) -> Result<(), std::io::Error> {
//! App::new(context)
//!     .register_module(PagesModule)
//!     .register_module(AuthModule)
//!     .register_module(SettingsModule)
//!     .serve()
//!     .await
//! # }
//! ```

mod app;
pub mod auth;
mod config;
mod core;
pub mod digest;
mod error;
pub mod health;
mod http;
pub mod jobs;
pub mod mailer;
mod middleware;
pub mod render;
pub mod session;
pub mod stats;
pub mod store;
pub mod testing;
pub mod traits;
pub mod utils;
pub mod web;

// Re-exports for public API
pub use app::{AppContext, AppContextBuilder};
pub use config::{
    BootstrapConfig, Config, ConfigBuilder, DigestConfig, LoggingConfig, ServerConfig, SiteConfig,
    StatsConfig,
};
pub use core::App;
pub use error::{DugoutError, Result};
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use http::RouteModule;
pub use jobs::{DailySchedule, DailyScheduler, InMemoryJobQueue, JobRegistry, WorkerPool};
pub use traits::job::{Job, JobData, JobQueue};
pub use traits::mailer::{Mailer, OutboundMail, Recipients};
pub use traits::session::{SessionData, SessionStore};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before creating the App.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "dugout=debug")
/// - `DUGOUT_LOG_JSON`: Set to "true" for JSON formatted logs
///
/// # Example
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() {
///     dugout::init_tracing();
///     // ... rest of your app
/// }
/// ```
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("DUGOUT_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
