//! crates/reflections_core/src/service.rs
//!
//! Use-case services for reflections and subscribers: thin validation
//! layers in front of the `Store` port.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::domain::{NewReflection, ReflectionEntry, Subscriber};
use crate::ports::{PortError, PortResult, Store};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

//=========================================================================================
// Reflection Service
//=========================================================================================

/// Validates and orchestrates reflection CRUD against the store.
#[derive(Clone)]
pub struct ReflectionService {
    store: Arc<dyn Store>,
}

impl ReflectionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validates the input, assigns a fresh opaque id and persists the entry.
    pub async fn create(&self, input: NewReflection) -> PortResult<ReflectionEntry> {
        let input = validate_reflection(input)?;
        let entry = ReflectionEntry {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            body: input.body,
            date: input.date,
        };
        self.store.insert_reflection(entry).await
    }

    /// Fully replaces the entry stored under `id`; the id itself is
    /// immutable across updates.
    pub async fn update(&self, id: &str, input: NewReflection) -> PortResult<ReflectionEntry> {
        let input = validate_reflection(input)?;
        let entry = ReflectionEntry {
            id: id.to_string(),
            title: input.title,
            body: input.body,
            date: input.date,
        };
        self.store.replace_reflection(id, entry).await
    }

    pub async fn delete(&self, id: &str) -> PortResult<()> {
        if self.store.delete_reflection(id).await? {
            Ok(())
        } else {
            Err(PortError::NotFound(format!("Reflection {id} not found")))
        }
    }

    /// Returns all entries sorted by date descending. Entries sharing a
    /// date keep their original relative order (stable sort); entries with
    /// unparseable dates sort last.
    pub async fn list(&self) -> PortResult<Vec<ReflectionEntry>> {
        let mut entries = self.store.list_reflections().await?;
        entries.sort_by(|a, b| parse_entry_date(&b.date).cmp(&parse_entry_date(&a.date)));
        Ok(entries)
    }
}

fn validate_reflection(input: NewReflection) -> PortResult<NewReflection> {
    let title = input.title.trim().to_string();
    let body = input.body.trim().to_string();
    let date = input.date.trim().to_string();
    if title.is_empty() || body.is_empty() || date.is_empty() {
        return Err(PortError::Invalid(
            "Title, body and date are required".to_string(),
        ));
    }
    Ok(NewReflection { title, body, date })
}

/// Accepts `YYYY-MM-DD` or RFC 3339 date strings; anything else is `None`.
fn parse_entry_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.naive_utc());
    }
    None
}

//=========================================================================================
// Subscriber Service
//=========================================================================================

/// Validates and stores newsletter subscriptions, enforcing one record per
/// normalized email address.
#[derive(Clone)]
pub struct SubscriberService {
    store: Arc<dyn Store>,
}

impl SubscriberService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Normalizes and validates the address, then persists a new record
    /// with `selected` off. A second registration of the same normalized
    /// address is rejected as a duplicate.
    pub async fn subscribe(&self, email: &str) -> PortResult<Subscriber> {
        let email = normalize_email(email);
        if !EMAIL_RE.is_match(&email) {
            return Err(PortError::Invalid(format!(
                "'{email}' is not a valid email address"
            )));
        }
        if self.store.find_subscriber(&email).await?.is_some() {
            return Err(PortError::Duplicate(email));
        }

        let subscriber = Subscriber {
            email,
            date: Utc::now().date_naive().to_string(),
            selected: false,
        };
        self.store.insert_subscriber(subscriber).await
    }

    pub async fn list(&self) -> PortResult<Vec<Subscriber>> {
        self.store.list_subscribers().await
    }

    pub async fn remove(&self, email: &str) -> PortResult<()> {
        let email = normalize_email(email);
        if self.store.delete_subscriber(&email).await? {
            Ok(())
        } else {
            Err(PortError::NotFound(format!("Subscriber {email} not found")))
        }
    }

    /// Toggles the `selected` flag on the listed addresses, returning how
    /// many records were updated.
    pub async fn set_selection(&self, emails: &[String], selected: bool) -> PortResult<u64> {
        let normalized: Vec<String> = emails.iter().map(|e| normalize_email(e)).collect();
        self.store
            .set_subscriber_selection(&normalized, selected)
            .await
    }

    /// The newsletter target set: addresses of subscribers flagged
    /// `selected`.
    pub async fn selected_recipients(&self) -> PortResult<Vec<String>> {
        Ok(self
            .store
            .list_subscribers()
            .await?
            .into_iter()
            .filter(|s| s.selected)
            .map(|s| s.email)
            .collect())
    }
}

/// Lowercases and trims an email address; all lookups and uniqueness checks
/// run on this normalized form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
