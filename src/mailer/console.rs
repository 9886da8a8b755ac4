//! Console mailer for development
//!
//! Prints messages to stdout instead of sending them. Body content is
//! redacted by default since stdout is often captured by log collectors.

use crate::error::Result;
use crate::traits::mailer::{Mailer, OutboundMail};
use async_trait::async_trait;

/// A mailer that prints messages to stdout instead of sending them
///
/// Useful for development when no SMTP server is configured and you want to
/// see what would have been sent.
#[derive(Debug, Clone)]
pub struct ConsoleMailer {
    prefix: String,
    show_full_content: bool,
}

impl ConsoleMailer {
    pub fn new() -> Self {
        Self {
            prefix: "[MAIL]".to_string(),
            show_full_content: false,
        }
    }

    /// Create a console mailer with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            show_full_content: false,
        }
    }

    /// Enable printing the full HTML body instead of a byte count.
    ///
    /// Only enable where stdout is not captured by logging systems.
    pub fn with_full_output(mut self, enabled: bool) -> Self {
        if enabled {
            tracing::warn!(
                "ConsoleMailer: full output enabled - mail content will be visible in logs"
            );
        }
        self.show_full_content = enabled;
        self
    }
}

impl Default for ConsoleMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        mail.validate()?;

        println!("{} ════════════════════════════════════════", self.prefix);
        println!("{} From:    {}", self.prefix, mail.from);
        println!("{} To:      {} recipient(s)", self.prefix, mail.to.len());
        println!("{} Subject: {}", self.prefix, mail.subject);
        println!("{} ────────────────────────────────────────", self.prefix);
        if self.show_full_content {
            for line in mail.html.lines() {
                println!("{} {}", self.prefix, line);
            }
        } else {
            println!("{} [HTML] {} bytes [REDACTED]", self.prefix, mail.html.len());
        }
        println!("{} ════════════════════════════════════════", self.prefix);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::mailer::Recipients;

    #[tokio::test]
    async fn test_console_mailer_delivers_without_error() {
        let mailer = ConsoleMailer::new();
        let mail = OutboundMail::new(
            "from@test.com",
            Recipients::new(["to@test.com"]),
            "Test Subject",
            "<p>Test body</p>",
        );

        let result = mailer.deliver(&mail).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_mailer_validates_mail() {
        let mailer = ConsoleMailer::new();
        // Empty body fails validation
        let mail = OutboundMail::new(
            "from@test.com",
            Recipients::new(["to@test.com"]),
            "Test Subject",
            "",
        );

        let result = mailer.deliver(&mail).await;
        assert!(result.is_err());
    }
}
