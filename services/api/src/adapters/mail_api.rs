//! services/api/src/adapters/mail_api.rs
//!
//! HTTP mail-provider implementation of the `MailTransport` port. Messages
//! go out through the provider's JSON API; per-request timing is bounded by
//! the HTTP client's own request timeout rather than an explicit race.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use reflections_core::ports::{MailTransport, PortError, PortResult};

use crate::config::Config;
use crate::error::ApiError;

/// Request timeout baked into the provider client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `MailTransport` port against an HTTP
/// mail-provider API.
pub struct HttpApiTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
    from: String,
}

impl HttpApiTransport {
    /// Creates a new `HttpApiTransport` from configuration plus the
    /// provider credential that selected it.
    pub fn from_config(config: &Config, token: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build mail API client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.mail_api_url.trim_end_matches('/').to_string(),
            token,
            from: config.mail_from.clone(),
        })
    }
}

/// The provider's send-email payload shape.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

//=========================================================================================
// `MailTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl MailTransport for HttpApiTransport {
    async fn send_one(
        &self,
        address: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> PortResult<()> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: address,
            subject,
            html_body,
            text_body,
        };

        self.client
            .post(format!("{}/email", self.base_url))
            .header("X-Server-Token", &self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| PortError::Transport(e.to_string()))?;

        Ok(())
    }
}
