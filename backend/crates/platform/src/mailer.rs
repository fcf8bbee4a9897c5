//! Outgoing Mail
//!
//! [`SmtpMailer`] relays through an authenticated SMTP server (Gmail by
//! default). [`LogMailer`] is used when no SMTP credentials are configured
//! and writes the message to the log instead.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// A single HTML message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_name: String,
}

impl MailConfig {
    /// Credentials present, SMTP can be used
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// ============================================================================
// SMTP
// ============================================================================

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let address = config
            .username
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::InvalidAddress(e.to_string()))?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| MailError::InvalidAddress(e.to_string()))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(mail.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(&mail)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!(to = %mail.to, error = %e, "SMTP delivery failed");
            MailError::Transport(e.to_string())
        })?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "Mail sent");
        Ok(())
    }
}

// ============================================================================
// Log only
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            "SMTP not configured, mail not delivered"
        );
        tracing::debug!(body = %mail.html, "Undelivered mail body");
        Ok(())
    }
}

/// Either transport, picked at startup from [`MailConfig`]
pub enum AppMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl AppMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        if config.is_configured() {
            Ok(Self::Smtp(SmtpMailer::new(config)?))
        } else {
            tracing::warn!("GMAIL_USER/GMAIL_PASS not set, mails will only be logged");
            Ok(Self::Log(LogMailer))
        }
    }
}

impl Mailer for AppMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        match self {
            Self::Smtp(mailer) => Mailer::send(mailer, mail).await,
            Self::Log(mailer) => Mailer::send(mailer, mail).await,
        }
    }
}
