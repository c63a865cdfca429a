//! Admin sessions.
//!
//! An admin logs in with the configured password and gets an opaque bearer
//! token. Every admin request presents the token; logout revokes it. Tokens
//! expire after the configured TTL.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A freshly issued admin session.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    /// Bearer token to send as `Authorization: Bearer <token>`
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Hex SHA-256 digest of a password.
#[must_use]
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issued admin tokens and their expiry.
#[derive(Debug)]
pub struct SessionStore {
    /// Expected password digest; `None` disables login
    password_sha256: Option<String>,
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    /// Creates a store checking passwords against `password_sha256`.
    pub fn new(password_sha256: Option<String>, ttl_minutes: u32) -> Self {
        Self {
            password_sha256: password_sha256.map(|digest| digest.to_lowercase()),
            ttl: Duration::minutes(i64::from(ttl_minutes)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Whether login is configured at all.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.password_sha256.is_some()
    }

    /// Checks the password and issues a token.
    pub fn login(&self, password: &str) -> Option<AdminSession> {
        let expected = self.password_sha256.as_deref()?;
        if password_digest(password) != expected {
            tracing::warn!("Rejected admin login attempt");
            return None;
        }

        let now = Utc::now();
        let session = AdminSession {
            token: Uuid::new_v4().to_string(),
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(session.token.clone(), session.expires_at);
        tracing::info!("Admin session started");

        Some(session)
    }

    /// Whether a token belongs to a live session.
    #[must_use]
    pub fn validate(&self, token: &str) -> bool {
        self.validate_at(token, Utc::now())
    }

    fn validate_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Revokes a token. Returns whether it existed.
    pub fn logout(&self, token: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some();
        if removed {
            tracing::info!("Admin session ended");
        }
        removed
    }

    /// Number of tracked sessions, expired ones included until the next login.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no sessions are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
