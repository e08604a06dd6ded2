//! crates/reflections_core/src/session.rs
//!
//! In-memory admin session management. A single shared password guards the
//! admin surface; each successful login is issued a random bearer token
//! that expires a fixed 24 hours after issuance.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::AdminSession;
use crate::ports::{PortError, PortResult};

/// How long an issued admin token stays valid.
const SESSION_TTL_HOURS: i64 = 24;

/// Random bytes per token; hex-encoded to twice as many characters.
const TOKEN_BYTES: usize = 32;

/// Issues and validates admin bearer tokens against one fixed credential.
///
/// The active token set lives in process memory only: restarting the
/// process invalidates every session. Expired tokens are purged lazily
/// whenever a token is looked up. There is a single admin identity; any
/// valid token authorizes all admin actions.
pub struct AdminSessionManager {
    password: String,
    ttl: Duration,
    active: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl AdminSessionManager {
    /// Creates a manager guarding the admin surface with `password`.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ttl: Duration::hours(SESSION_TTL_HOURS),
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Checks the supplied password and issues a fresh session on match.
    pub fn authenticate(&self, password: &str) -> PortResult<AdminSession> {
        self.authenticate_at(password, Utc::now())
    }

    /// True iff `token` was issued here and has not yet expired.
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    /// Clock-explicit variant of [`authenticate`](Self::authenticate).
    pub fn authenticate_at(
        &self,
        password: &str,
        now: DateTime<Utc>,
    ) -> PortResult<AdminSession> {
        if password != self.password {
            return Err(PortError::Unauthorized);
        }

        let session = AdminSession {
            token: generate_token(),
            expires_at: now + self.ttl,
        };

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.insert(session.token.clone(), session.expires_at);

        Ok(session)
    }

    /// Clock-explicit variant of [`is_valid`](Self::is_valid). Expired
    /// entries are dropped from the active set as a side effect.
    pub fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.retain(|_, expires_at| *expires_at > now);
        active.contains_key(token)
    }
}

/// Generates a 256-bit token from the operating system's secure RNG,
/// hex-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
