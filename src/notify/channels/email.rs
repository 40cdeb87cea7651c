//! Email adapter using SMTP.

use super::ChannelAdapter;
use crate::error::ChannelError;
use crate::notify::destination::{Destination, DestinationKind};
use crate::notify::formatter::Payload;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// SMTP connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    /// Relay host
    pub smtp_host: String,
    /// Relay port
    pub smtp_port: u16,
    /// Use STARTTLS
    pub starttls: bool,
    /// Optional login
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
    /// From address
    pub sender_address: String,
    /// From display name
    pub sender_name: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            starttls: true,
            username: None,
            password: None,
            sender_address: "alerts@localhost".to_string(),
            sender_name: "hostalert".to_string(),
        }
    }
}

/// Email adapter
pub struct EmailAdapter {
    settings: SmtpSettings,
    timeout: Duration,
}

impl EmailAdapter {
    /// Create a new email adapter
    #[must_use]
    pub const fn new(settings: SmtpSettings, timeout: Duration) -> Self {
        Self { settings, timeout }
    }

    /// Build the message for a recipient
    ///
    /// Destinations without a separate title never reach mail, so a missing
    /// title falls back to the first line of the body.
    pub fn build_message(&self, to: &str, payload: &Payload) -> Result<Message, ChannelError> {
        let from = Mailbox::new(
            Some(self.settings.sender_name.clone()),
            self.settings
                .sender_address
                .parse()
                .map_err(|e| ChannelError::Email(format!("Invalid sender address: {}", e)))?,
        );

        let to: Mailbox = to
            .parse()
            .map_err(|e| ChannelError::Email(format!("Invalid recipient address: {}", e)))?;

        let subject = payload
            .title
            .clone()
            .unwrap_or_else(|| payload.body.lines().next().unwrap_or_default().to_string());

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(payload.body.clone())
            .map_err(|e| ChannelError::Email(format!("Failed to build email message: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport, ChannelError> {
        let host = self.settings.smtp_host.as_str();

        let builder = if self.settings.starttls {
            SmtpTransport::starttls_relay(host).map_err(|e| {
                ChannelError::Email(format!("Failed to create SMTP transport: {}", e))
            })?
        } else {
            SmtpTransport::builder_dangerous(host)
        };

        let mut builder = builder
            .port(self.settings.smtp_port)
            .timeout(Some(self.timeout));

        if let Some(username) = &self.settings.username {
            let password = self.settings.password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(builder.build())
    }
}

impl ChannelAdapter for EmailAdapter {
    fn send(&self, destination: &Destination, payload: &Payload) -> Result<(), ChannelError> {
        let Destination::Email(address) = destination else {
            return Err(ChannelError::NoAdapter(destination.kind().to_string()));
        };

        let message = self.build_message(address, payload)?;
        let mailer = self.transport()?;

        mailer
            .send(&message)
            .map_err(|e| ChannelError::Email(format!("Failed to send email via SMTP: {}", e)))?;

        log::info!("Sent email alert to {}", address);
        Ok(())
    }

    fn handles(&self, kind: DestinationKind) -> bool {
        kind == DestinationKind::Email
    }

    fn name(&self) -> &str {
        "email"
    }
}
