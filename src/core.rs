//! Application assembly and lifecycle.
//!
//! [`App`] collects the route modules over one [`AppContext`], applies the
//! middleware stack, and runs the server alongside its background pieces:
//! the job workers, the daily digest scheduler and the session sweeper.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tokio::signal;
use tokio::sync::mpsc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::app::AppContext;
use crate::digest::DailyDigestJob;
use crate::health;
use crate::http::RouteModule;
use crate::jobs::{DailySchedule, DailyScheduler, JobRegistry, WorkerPool};
use crate::middleware::MakeRequestUuid;

/// How often expired sessions are swept from the store.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Main application structure
pub struct App {
    router: Router<AppContext>,
    context: AppContext,
    worker_pool: Option<WorkerPool>,
    scheduler: Option<(tokio::task::JoinHandle<()>, mpsc::Sender<()>)>,
}

impl App {
    /// Creates a new App over the given context.
    ///
    /// The health endpoint is always present; everything else arrives via
    /// [`register_module`](Self::register_module).
    pub fn new(context: AppContext) -> Self {
        let router = Router::new().route("/health", get(health::health_handler));
        Self {
            router,
            context,
            worker_pool: None,
            scheduler: None,
        }
    }

    /// Register a route module with the application
    ///
    /// The module's router inherits the `AppContext` state from the parent
    /// router; handlers access it through `State<AppContext>`.
    pub fn register_module<M: RouteModule>(mut self, module: M) -> Self {
        let module_router = module.routes();
        if let Some(prefix) = module.prefix() {
            self.router = self.router.nest(prefix, module_router);
        } else {
            self.router = self.router.merge(module_router);
        }
        self
    }

    /// Get the router for testing purposes
    ///
    /// Returns the router with state applied but without the middleware
    /// stack, ready for the scenario helpers in [`crate::testing`].
    pub fn into_test_router(self) -> Router {
        self.router.with_state(self.context)
    }

    /// Start background job workers
    pub fn start_workers(mut self, registry: Arc<JobRegistry>) -> Self {
        let worker_count = self.context.config.jobs.worker_count;
        let pool = WorkerPool::new(
            self.context.jobs.clone(),
            registry,
            Arc::new(self.context.clone()),
            worker_count,
        );
        self.worker_pool = Some(pool);
        tracing::info!(worker_count, "Background job workers started");
        self
    }

    /// Start the scheduler that books the daily digest, when enabled.
    pub fn start_daily_digest(mut self) -> Self {
        let config = &self.context.config;
        if !config.digest.enabled {
            tracing::info!("Daily digest is disabled");
            return self;
        }
        let Some(tz) = config.stats.tz() else {
            tracing::error!(
                timezone = %config.stats.timezone,
                "Unknown display timezone; daily digest not scheduled"
            );
            return self;
        };

        let schedule = DailySchedule::new(config.digest.hour, tz);
        let (scheduler, shutdown_rx) =
            DailyScheduler::new(schedule, self.context.jobs.clone(), Arc::new(DailyDigestJob));
        let shutdown_tx = scheduler.shutdown_handle();
        let handle = tokio::spawn(async move {
            scheduler.start(shutdown_rx).await;
        });
        self.scheduler = Some((handle, shutdown_tx));
        self
    }

    /// Apply the middleware stack
    fn with_middleware(mut self) -> Self {
        let mut router = self.router;

        // Body size limit - the app only accepts small forms
        router = router.layer(DefaultBodyLimit::max(
            self.context.config.server.max_body_size,
        ));

        // Request IDs for tracing, propagated to responses
        router = router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(PropagateRequestIdLayer::x_request_id());

        // HTTP tracing
        router = router.layer(TraceLayer::new_for_http());

        self.router = router;
        self
    }

    /// Periodically drop expired sessions from the store.
    fn start_session_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let sessions = self.context.sessions.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                tick.tick().await;
                match sessions.cleanup_expired().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Expired sessions removed"),
                    Err(error) => tracing::warn!(error = %error, "Session sweep failed"),
                }
            }
        })
    }

    /// Start the application server
    pub async fn serve(self) -> Result<(), std::io::Error> {
        let addr = self
            .context
            .config
            .server
            .addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let mut app = self.with_middleware();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("Server starting on http://{}", addr);
        tracing::info!("Health check available at http://{}/health", addr);

        let worker_pool = app.worker_pool.take();
        let scheduler = app.scheduler.take();
        let sweeper = app.start_session_sweeper();

        let shutdown = async move {
            shutdown_signal().await;
            if let Some((handle, shutdown_tx)) = scheduler {
                let _ = shutdown_tx.send(()).await;
                let _ = handle.await;
            }
            if let Some(pool) = worker_pool {
                pool.shutdown().await;
            }
            sweeper.abort();
        };

        // Router<AppContext> is a router missing its state; with_state
        // transitions it to the servable Router<()>
        let final_router = app.router.with_state(app.context);

        axum::serve(listener, final_router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give connections a grace period to close
    tokio::time::sleep(Duration::from_secs(1)).await;
    tracing::info!("Shutdown complete");
}

// ============================================================================
// App assembly tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, test_context};

    struct Probe;

    impl RouteModule for Probe {
        fn routes(&self) -> Router<AppContext> {
            Router::new().route("/ping", get(|| async { "pong" }))
        }

        fn prefix(&self) -> Option<&str> {
            Some("/probe")
        }
    }

    #[tokio::test]
    async fn test_health_route_is_always_registered() {
        let ctx = test_context().await;
        let router = App::new(ctx).into_test_router();

        testing::get(router, "/health")
            .execute()
            .await
            .assert_ok()
            .assert_json();
    }

    #[tokio::test]
    async fn test_register_module_nests_under_prefix() {
        let ctx = test_context().await;
        let router = App::new(ctx).register_module(Probe).into_test_router();

        testing::get(router, "/probe/ping")
            .execute()
            .await
            .assert_ok()
            .assert_contains("pong")
            .await;
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let ctx = test_context().await;
        let router = App::new(ctx).into_test_router();

        testing::get(router, "/nowhere")
            .execute()
            .await
            .assert_not_found();
    }
}
