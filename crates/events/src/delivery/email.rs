//! SMTP delivery for notification emails.
//!
//! Enabled by setting `SMTP_HOST`. The sender address and the transport are
//! prepared once in [`EmailDelivery::new`] and reused for every message.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const DEFAULT_PORT: u16 = 587;
const DEFAULT_SENDER: &str = "MH Construction <noreply@mhc-gc.com>";

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    /// Mailbox in `Name <address>` or bare-address form.
    pub sender: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EmailConfig {
    /// `None` unless `SMTP_HOST` is set. `SMTP_PORT`, `SMTP_FROM`,
    /// `SMTP_USER` and `SMTP_PASSWORD` are optional.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Some(Self {
            host,
            port,
            sender: std::env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SENDER.into()),
            username: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user.clone(), password.clone())),
            _ => None,
        }
    }
}

pub struct EmailDelivery {
    sender: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for EmailDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailDelivery")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl EmailDelivery {
    /// Fails when the sender address or relay host is malformed. No
    /// connection is opened until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let sender: Mailbox = config.sender.parse()?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let Some(credentials) = config.credentials() {
            builder = builder.credentials(credentials);
        }
        Ok(Self {
            sender,
            mailer: builder.build(),
        })
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    /// Send a plain-text message to `recipient`.
    pub async fn send(&self, recipient: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(message).await?;
        tracing::info!(recipient, subject, "Email delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(sender: &str) -> EmailConfig {
        EmailConfig {
            host: "smtp.example.com".into(),
            port: DEFAULT_PORT,
            sender: sender.into(),
            username: Some("mailer".into()),
            password: None,
        }
    }

    #[test]
    fn default_sender_parses_with_display_name() {
        let delivery = EmailDelivery::new(&config(DEFAULT_SENDER)).unwrap();
        assert_eq!(delivery.sender().name.as_deref(), Some("MH Construction"));
        assert_eq!(delivery.sender().email.to_string(), "noreply@mhc-gc.com");
    }

    #[test]
    fn credentials_need_both_user_and_password() {
        assert!(config(DEFAULT_SENDER).credentials().is_none());
        let mut full = config(DEFAULT_SENDER);
        full.password = Some("secret".into());
        assert!(full.credentials().is_some());
    }

    #[test]
    fn malformed_sender_is_rejected_up_front() {
        let result = EmailDelivery::new(&config("not an address"));
        assert_matches!(result, Err(EmailError::Address(_)));
    }

    #[test]
    fn debug_output_shows_only_the_sender() {
        let mut with_secret = config(DEFAULT_SENDER);
        with_secret.password = Some("hunter2".into());
        let rendered = format!("{:?}", EmailDelivery::new(&with_secret).unwrap());
        assert!(rendered.starts_with("EmailDelivery"));
        assert!(rendered.contains("noreply@mhc-gc.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn malformed_recipient_fails_before_connecting() {
        let delivery = EmailDelivery::new(&config(DEFAULT_SENDER)).unwrap();
        let err = delivery
            .send("nobody", "Subject", "Body".into())
            .await
            .unwrap_err();
        assert_matches!(err, EmailError::Address(_));
    }
}
