//! SMTP mailer using lettre
//!
//! Resolves the active stored mail settings on every send and opens a fresh
//! transport for it, so config edits take effect without a restart and the
//! connection never outlives the send.

use crate::error::{DugoutError, Result};
use crate::store::{MailSettings, SettingsStore};
use crate::traits::mailer::{Mailer, OutboundMail};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    transport::smtp::client::{Tls, TlsParameters},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

/// How the connection to the SMTP server is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TlsMode {
    /// TLS from the first byte (the stored `ssl` flag is set).
    Implicit,
    /// Plaintext connection, upgraded via STARTTLS when the server offers it.
    Opportunistic,
}

pub(crate) fn tls_mode(settings: &MailSettings) -> TlsMode {
    if settings.ssl {
        TlsMode::Implicit
    } else {
        TlsMode::Opportunistic
    }
}

/// SMTP mailer backed by the stored mail settings
///
/// Transport failures are logged and swallowed: a broken or misconfigured
/// mail server must not fail the daily job. A missing active settings row is
/// likewise a logged no-op.
pub struct SmtpMailer {
    settings: Arc<dyn SettingsStore>,
}

impl SmtpMailer {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    async fn send_with(&self, settings: &MailSettings, mail: &OutboundMail) -> Result<()> {
        mail.validate()?;

        let message = build_message(mail)?;
        let transport = build_transport(settings)?;

        tracing::info!(
            recipients = mail.to.len(),
            subject = %mail.subject,
            host = %settings.smtp_host,
            "Sending email"
        );

        transport
            .send(message)
            .await
            .map_err(|e| DugoutError::mail(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}

fn build_message(mail: &OutboundMail) -> Result<Message> {
    let from: Mailbox = mail.from.parse()?;

    let mut builder = Message::builder().from(from).subject(&mail.subject);
    for to in mail.to.addresses() {
        let mailbox: Mailbox = to.parse()?;
        builder = builder.to(mailbox);
    }

    // HTML goes in an alternative part so text-only clients show something
    // sensible if a plain part is ever added.
    let message = builder.multipart(
        MultiPart::alternative().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(mail.html.clone()),
        ),
    )?;

    Ok(message)
}

fn build_transport(settings: &MailSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let builder = match tls_mode(settings) {
        TlsMode::Implicit => {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
                .map_err(|e| DugoutError::mail(format!("Failed to create SMTP transport: {}", e)))?
        }
        TlsMode::Opportunistic => {
            let tls = TlsParameters::new(settings.smtp_host.clone())
                .map_err(|e| DugoutError::mail(format!("Failed to set up TLS: {}", e)))?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.smtp_host)
                .tls(Tls::Opportunistic(tls))
        }
    };

    let credentials = Credentials::new(settings.username.clone(), settings.password.clone());

    Ok(builder
        .port(settings.port)
        .credentials(credentials)
        .build())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        let Some(settings) = self.settings.active_settings().await? else {
            tracing::error!("No mailer config found; not sending");
            return Ok(());
        };

        if let Err(err) = self.send_with(&settings, mail).await {
            tracing::error!(
                error = %err,
                host = %settings.smtp_host,
                port = settings.port,
                "Error sending email"
            );
        }

        Ok(())
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").finish_non_exhaustive()
    }
}
