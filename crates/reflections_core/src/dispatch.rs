//! crates/reflections_core/src/dispatch.rs
//!
//! Bulk newsletter dispatch. Sends one message per recipient through the
//! configured transport and aggregates per-address outcomes. A failing
//! address never aborts the batch.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{DispatchOutcome, DispatchSummary};
use crate::ports::MailTransport;

/// A user-level dispatch rejection, raised before any transport call.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Subject and body are required")]
    EmptyMessage,
    #[error("No recipients to send to")]
    NoRecipients,
}

/// Sends a newsletter message to a set of addresses, one at a time.
///
/// Sends are issued sequentially, which bounds pressure on third-party
/// rate limits at the cost of O(recipients) total latency. Once a batch
/// begins it runs to completion; there is no mid-flight cancellation.
pub struct NewsletterDispatcher {
    transport: Arc<dyn MailTransport>,
}

impl NewsletterDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Attempts one send per recipient, in the given order.
    ///
    /// The plain-text `body` is rendered to HTML once and reused for every
    /// message; the text form travels verbatim as the fallback part. Each
    /// recipient's success or failure is recorded in the returned summary.
    pub async fn send(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<DispatchSummary, DispatchError> {
        let subject = subject.trim();
        if subject.is_empty() || body.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        if recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let html = render_html_body(body);
        let mut summary = DispatchSummary::default();

        for address in recipients {
            match self.transport.send_one(address, subject, &html, body).await {
                Ok(()) => {
                    summary.sent += 1;
                    summary.outcomes.push(DispatchOutcome {
                        address: address.clone(),
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(address = %address, error = %e, "Newsletter send failed");
                    summary.failed += 1;
                    summary.outcomes.push(DispatchOutcome {
                        address: address.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        Ok(summary)
    }
}

/// Renders a plain-text body as HTML: markup characters are escaped and
/// each line break becomes an explicit `<br>`.
pub fn render_html_body(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
