//! Mailer trait for sending the report emails
//!
//! This trait abstracts the outbound mail backend, allowing the SMTP
//! implementation to be swapped for console output in development or a
//! recording stub in tests.

use crate::error::Result;
use async_trait::async_trait;

/// Recipient addresses for an outbound message.
///
/// Callers hand over an explicit list of addresses. `from_joined` accepts the
/// legacy form, a single string with whitespace-separated addresses, and
/// splits it; both forms normalize to the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    /// Build from an explicit list of addresses.
    pub fn new(addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(addresses.into_iter().map(|a| a.into()).collect())
    }

    /// Build from a single whitespace-separated string of addresses.
    pub fn from_joined(joined: &str) -> Self {
        Self(joined.split_whitespace().map(str::to_string).collect())
    }

    pub fn addresses(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for Recipients {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses)
    }
}

/// An email message to be sent
#[derive(Debug, Clone)]
pub struct OutboundMail {
    /// Sender email address
    pub from: String,
    /// Recipient email addresses
    pub to: Recipients,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

impl OutboundMail {
    pub fn new(
        from: impl Into<String>,
        to: Recipients,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to,
            subject: subject.into(),
            html: html.into(),
        }
    }

    /// Validate the message has required fields
    pub fn validate(&self) -> Result<()> {
        if self.from.is_empty() {
            return Err(crate::error::DugoutError::bad_request(
                "Mail 'from' is required",
            ));
        }
        if self.to.is_empty() {
            return Err(crate::error::DugoutError::bad_request(
                "Mail 'to' is required",
            ));
        }
        if self.subject.is_empty() {
            return Err(crate::error::DugoutError::bad_request(
                "Mail 'subject' is required",
            ));
        }
        if self.html.is_empty() {
            return Err(crate::error::DugoutError::bad_request(
                "Mail body is required",
            ));
        }
        Ok(())
    }
}

/// Mailer trait for delivering messages
///
/// # Example
///
/// ```rust,ignore
/// use dugout::traits::mailer::{Mailer, OutboundMail, Recipients};
/// use dugout::error::Result;
/// use async_trait::async_trait;
///
/// struct MyMailer;
///
/// #[async_trait]
/// impl Mailer for MyMailer {
///     async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
///         // Hand the message to your preferred service
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message.
    ///
    /// The SMTP backend treats transport failures as non-fatal: they are
    /// logged and `Ok(())` is returned, so a broken mail server never takes
    /// down the caller. Other backends may surface errors.
    async fn deliver(&self, mail: &OutboundMail) -> Result<()>;
}
