//! Upload notification mail.
//!
//! Entirely optional: without `SMTP_HOST` in the environment no transport is
//! built and uploads proceed silently. Sends are fire-and-forget on a spawned
//! task; a failed send is logged and never affects the already-saved file.

use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

#[derive(Clone)]
pub struct Notifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Notifier {
    /// Build the notifier from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`,
    /// `SMTP_PASSWORD`, `MAIL_FROM` and `MAIL_TO`. Returns `Ok(None)` when
    /// `SMTP_HOST` is unset.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(host) = std::env::var("SMTP_HOST") else {
            return Ok(None);
        };

        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .context("Invalid SMTP_PORT")?;
        let from: Mailbox = std::env::var("MAIL_FROM")
            .context("MAIL_FROM is required when SMTP_HOST is set")?
            .parse()
            .context("Invalid MAIL_FROM address")?;
        let to: Mailbox = std::env::var("MAIL_TO")
            .context("MAIL_TO is required when SMTP_HOST is set")?
            .parse()
            .context("Invalid MAIL_TO address")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .context("Failed to build SMTP transport")?
            .port(port);
        if let Ok(user) = std::env::var("SMTP_USERNAME") {
            let pass = std::env::var("SMTP_PASSWORD").unwrap_or_default();
            builder = builder.credentials(Credentials::new(user, pass));
        }

        info!("Upload notifications enabled via {}:{}", host, port);
        Ok(Some(Self {
            transport: builder.build(),
            from,
            to,
        }))
    }

    /// Queue a notification for an uploaded file and return immediately.
    pub fn notify_upload(&self, filename: &str) {
        let notifier = self.clone();
        let filename = filename.to_string();
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&filename).await {
                warn!("Failed to send upload notification for {}: {:#}", filename, e);
            }
        });
    }

    async fn send(&self, filename: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New file uploaded: {}", filename))
            .body(format!(
                "{} was uploaded to the file portal at {}.",
                filename,
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            ))
            .context("Failed to build notification message")?;
        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
