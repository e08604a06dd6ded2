use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reflections_core::dispatch::{render_html_body, DispatchError, NewsletterDispatcher};
use reflections_core::ports::{MailTransport, PortError, PortResult};

/// A transport that records every call and fails for selected addresses.
struct FlakyTransport {
    fail_for: Vec<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl FlakyTransport {
    fn new(fail_for: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            fail_for,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for FlakyTransport {
    async fn send_one(
        &self,
        address: &str,
        _subject: &str,
        _html_body: &str,
        _text_body: &str,
    ) -> PortResult<()> {
        self.calls.lock().unwrap().push(address.to_string());
        if self.fail_for.iter().any(|f| *f == address) {
            return Err(PortError::Transport("mailbox unavailable".to_string()));
        }
        Ok(())
    }
}

fn recipients(addresses: &[&str]) -> Vec<String> {
    addresses.iter().map(|a| a.to_string()).collect()
}

#[tokio::test]
async fn every_recipient_gets_exactly_one_attempt() {
    let transport = FlakyTransport::new(vec![]);
    let dispatcher = NewsletterDispatcher::new(transport.clone());

    let summary = dispatcher
        .send("Hello", "A thought for today.", &recipients(&["a@x.com", "b@x.com", "c@x.com"]))
        .await
        .unwrap();

    assert_eq!(summary.sent, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(transport.calls(), vec!["a@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn one_failure_does_not_abort_the_batch() {
    let transport = FlakyTransport::new(vec!["b@x.com"]);
    let dispatcher = NewsletterDispatcher::new(transport.clone());

    let summary = dispatcher
        .send("Hello", "Body", &recipients(&["a@x.com", "b@x.com"]))
        .await
        .unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.outcomes.len(), 2);

    let a = &summary.outcomes[0];
    assert_eq!(a.address, "a@x.com");
    assert!(a.success);
    assert!(a.error.is_none());

    let b = &summary.outcomes[1];
    assert_eq!(b.address, "b@x.com");
    assert!(!b.success);
    assert!(b.error.as_deref().unwrap().contains("mailbox unavailable"));
}

#[tokio::test]
async fn failures_in_the_middle_still_reach_later_recipients() {
    let transport = FlakyTransport::new(vec!["a@x.com", "b@x.com"]);
    let dispatcher = NewsletterDispatcher::new(transport.clone());

    let summary = dispatcher
        .send("Hello", "Body", &recipients(&["a@x.com", "b@x.com", "c@x.com"]))
        .await
        .unwrap();

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(transport.calls().len(), 3);
}

#[tokio::test]
async fn empty_recipient_set_is_rejected_without_transport_calls() {
    let transport = FlakyTransport::new(vec![]);
    let dispatcher = NewsletterDispatcher::new(transport.clone());

    let err = dispatcher.send("Hello", "Body", &[]).await.unwrap_err();
    assert_eq!(err, DispatchError::NoRecipients);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn blank_subject_or_body_is_rejected_without_transport_calls() {
    let transport = FlakyTransport::new(vec![]);
    let dispatcher = NewsletterDispatcher::new(transport.clone());

    let err = dispatcher
        .send("   ", "Body", &recipients(&["a@x.com"]))
        .await
        .unwrap_err();
    assert_eq!(err, DispatchError::EmptyMessage);

    let err = dispatcher
        .send("Hello", "\n", &recipients(&["a@x.com"]))
        .await
        .unwrap_err();
    assert_eq!(err, DispatchError::EmptyMessage);

    assert!(transport.calls().is_empty());
}

#[test]
fn html_body_escapes_markup_and_converts_line_breaks() {
    assert_eq!(
        render_html_body("one\ntwo\r\nthree"),
        "one<br>two<br>three"
    );
    assert_eq!(
        render_html_body("a < b & b > c"),
        "a &lt; b &amp; b &gt; c"
    );
}
