//! services/api/src/adapters/smtp.rs
//!
//! SMTP implementation of the `MailTransport` port, built on `lettre`'s
//! async transport. Each send is bounded by a fixed timeout: past it the
//! caller stops waiting and records a failure, with no guarantee that the
//! underlying network operation is cancelled.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use reflections_core::ports::{MailTransport, PortError, PortResult};

use crate::config::Config;
use crate::error::ApiError;

/// Upper bound on a single SMTP send.
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `MailTransport` port through an SMTP relay.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    /// Builds the relay client from configuration. Credentials are attached
    /// only when both username and password are present.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let from = config.mail_from.parse::<Mailbox>().map_err(|e| {
            ApiError::Internal(format!(
                "Invalid MAIL_FROM address '{}': {e}",
                config.mail_from
            ))
        })?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| {
                    ApiError::Internal(format!(
                        "Invalid SMTP relay '{}': {e}",
                        config.smtp_host
                    ))
                })?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

//=========================================================================================
// `MailTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send_one(
        &self,
        address: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> PortResult<()> {
        let to = address.parse::<Mailbox>().map_err(|e| {
            PortError::Transport(format!("Invalid recipient address '{address}': {e}"))
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text_body.to_string(),
                html_body.to_string(),
            ))
            .map_err(|e| PortError::Transport(e.to_string()))?;

        match tokio::time::timeout(SEND_TIMEOUT, self.mailer.send(message)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(PortError::Transport(e.to_string())),
            Err(_) => Err(PortError::Transport(format!(
                "Send to {address} timed out after {}s",
                SEND_TIMEOUT.as_secs()
            ))),
        }
    }
}
