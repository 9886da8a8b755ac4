//! Session management and storage.
//!
//! The session id rides in a browser cookie; session data (logged-in user,
//! pending flash messages) lives server-side behind the
//! [`SessionStore`](crate::traits::session::SessionStore) trait.

mod config;
pub mod cookie;
mod in_memory;

pub use config::SessionConfig;
pub use in_memory::InMemorySessionStore;

pub use crate::traits::session::{SessionData, SessionStore};
