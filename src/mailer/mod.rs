//! Outbound mail backends
//!
//! Two backends implement the [`Mailer`](crate::traits::mailer::Mailer) trait:
//! - `SmtpMailer` - resolves the stored mail settings and sends via SMTP
//! - `ConsoleMailer` - prints messages to stdout (for development)

mod console;
mod smtp;

pub use console::ConsoleMailer;
pub use smtp::SmtpMailer;

// Re-export the message types from traits for convenience
pub use crate::traits::mailer::{Mailer, OutboundMail, Recipients};
