use crate::app::AppContext;
use axum::Router;

/// Trait for composable route modules
///
/// Each page group implements this to register its own routes and be
/// composed into the main application.
///
/// # Example
///
/// ```ignore
/// struct PagesModule;
///
/// impl RouteModule for PagesModule {
///     fn routes(&self) -> Router<AppContext> {
///         Router::new()
///             .route("/", get(index))
///             .route("/today", get(today))
///     }
/// }
/// ```
pub trait RouteModule {
    /// Returns a router with all routes for this module
    ///
    /// The router should NOT have state applied - state is applied by the
    /// App when merging modules. Handlers should use `State<AppContext>`
    /// to access the application context.
    fn routes(&self) -> Router<AppContext>
    where
        Self: Sized;

    /// Optional: specify a path prefix for all routes in this module
    fn prefix(&self) -> Option<&str> {
        None
    }

    /// Registers this module's routes into the application router
    fn register(self, router: Router<AppContext>) -> Router<AppContext>
    where
        Self: Sized,
    {
        let routes = self.routes();

        if let Some(prefix) = self.prefix() {
            router.nest(prefix, routes)
        } else {
            router.merge(routes)
        }
    }
}
