//! Email service for sending notification emails.
//!
//! Uses `lettre` for SMTP transport. Delivery outcomes are reported per
//! message; callers must never depend on a send succeeding.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending notification emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Sends an email with an HTML body and an optional plain-text
    /// alternative.
    ///
    /// Returns the generated message ID on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the addresses are invalid, the message cannot
    /// be built, or the SMTP relay rejects it.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        text: Option<&str>,
    ) -> Result<String, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let message_id = format!("<{}@{}>", Uuid::now_v7(), self.config.smtp_host);

        let builder = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .message_id(Some(message_id.clone()));

        let email = match text {
            Some(text) => builder.multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                html.to_string(),
            )),
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(html.to_string()),
        }
        .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert_eq!(config.from_email, "no-reply@divvy.dev");
    }

    #[tokio::test]
    async fn test_invalid_recipient_address() {
        let service = EmailService::new(EmailConfig::default());
        let result = service
            .send("not-an-address", "Subject", "<p>Hi</p>", None)
            .await;
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }
}
