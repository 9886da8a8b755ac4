//! Testing utilities for exercising the application in-process.
//!
//! Two halves: [`Scenario`] drives the router through the full middleware and
//! handler stack without binding a socket, and the fixtures assemble an
//! [`AppContext`](crate::app::AppContext) on in-memory backends, with canned
//! upstream stats and a recording outbox in place of the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use dugout::testing::{self, seed_subscriber, test_app};
//!
//! #[tokio::test]
//! async fn test_today_requires_login() {
//!     let app = test_app().await;
//!     seed_subscriber(&app.ctx, "fan@example.com").await;
//!
//!     testing::get(app.router(), "/today")
//!         .execute()
//!         .await
//!         .assert_redirect("/login");
//! }
//! ```

mod fixtures;
mod scenario;

pub use fixtures::{
    seed_admin, seed_mail_settings, seed_subscriber, seed_user, test_app, test_app_with,
    test_context, RecordingMailer, StubStatsApi, TestApp,
};
pub use scenario::{get, post, Scenario, ScenarioAssert};
