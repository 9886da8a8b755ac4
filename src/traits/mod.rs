//! Trait definitions for extensible components
//!
//! These traits allow swapping implementations for session management,
//! background jobs, outbound mail, and the upstream stats source.

pub mod job;
pub mod mailer;
pub mod session;
