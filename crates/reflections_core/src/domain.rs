//! crates/reflections_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

/// A single published reflection entry.
///
/// `id` is generated at creation and immutable afterwards; uniqueness of
/// `id` is the only structural invariant. Several entries may share the
/// same `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionEntry {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: String,
}

/// Validated input for creating or fully replacing a reflection.
#[derive(Debug, Clone)]
pub struct NewReflection {
    pub title: String,
    pub body: String,
    pub date: String,
}

/// A newsletter subscriber, keyed by its lowercase email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub email: String,
    pub date: String,
    pub selected: bool,
}

/// An issued admin bearer token and its absolute expiry.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The outcome of a single newsletter send attempt.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub address: String,
    pub success: bool,
    pub error: Option<String>,
}

/// Aggregated result of one bulk newsletter dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub outcomes: Vec<DispatchOutcome>,
}
