//! crates/reflections_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like storage backends
//! or mail providers.

use async_trait::async_trait;

use crate::domain::{ReflectionEntry, Subscriber};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port operation.
///
/// `Transport` failures are always isolated to a single recipient's outcome
/// and never abort a running batch; `Storage` failures are internal errors.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already subscribed: {0}")]
    Duplicate(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Send failed: {0}")]
    Transport(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable CRUD over reflections and subscribers.
///
/// Whether records live in a single JSON document on disk or in a
/// multi-record database collection is an implementation choice behind this
/// interface; the backend is selected once, by configuration, at startup.
#[async_trait]
pub trait Store: Send + Sync {
    // --- Reflections ---
    async fn insert_reflection(&self, entry: ReflectionEntry) -> PortResult<ReflectionEntry>;

    async fn find_reflection(&self, id: &str) -> PortResult<Option<ReflectionEntry>>;

    /// Returns all reflections in insertion order; callers impose sorting.
    async fn list_reflections(&self) -> PortResult<Vec<ReflectionEntry>>;

    /// Fully replaces the entry stored under `id`. Fails with `NotFound`
    /// when no such entry exists.
    async fn replace_reflection(&self, id: &str, entry: ReflectionEntry)
        -> PortResult<ReflectionEntry>;

    /// Removes the entry stored under `id`, reporting whether it existed.
    async fn delete_reflection(&self, id: &str) -> PortResult<bool>;

    // --- Subscribers ---

    /// Inserts a subscriber record. Fails with `Duplicate` when a record
    /// for the same normalized email already exists.
    async fn insert_subscriber(&self, subscriber: Subscriber) -> PortResult<Subscriber>;

    async fn find_subscriber(&self, email: &str) -> PortResult<Option<Subscriber>>;

    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>>;

    /// Sets the `selected` flag on every listed email, returning how many
    /// records were updated. Unknown emails are skipped silently.
    async fn set_subscriber_selection(&self, emails: &[String], selected: bool)
        -> PortResult<u64>;

    /// Removes the subscriber stored under `email`, reporting whether it existed.
    async fn delete_subscriber(&self, email: &str) -> PortResult<bool>;
}

/// One-message-at-a-time outbound mail delivery.
///
/// The newsletter dispatcher is written against this trait only; the
/// concrete transport (SMTP relay or HTTP mail provider) is a
/// configuration-time choice.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Delivers a single message to one address, or reports why it could not.
    async fn send_one(
        &self,
        address: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> PortResult<()>;
}
