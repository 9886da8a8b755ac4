//! HTTP plumbing shared by the route modules.

pub mod routes;

pub use routes::RouteModule;
