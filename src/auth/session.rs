use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::KeyValueStorage;

/// Storage key for the persisted session
const SESSION_KEY: &str = "session";

/// Session lifetime in hours (3 days, matching the backend token lifetime).
const SESSION_EXPIRY_HOURS: i64 = 72;

/// Source of the bearer token for API requests. The client asks on every
/// request, so token rotation needs no client rebuild.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed token, mainly for tests and one-shot tooling.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::hours(SESSION_EXPIRY_HOURS);
        Utc::now() > expiry
    }
}

/// Authenticated session persisted through the storage adapter.
/// Shared with the `ApiClient` as its `TokenProvider`.
pub struct Session {
    storage: Arc<dyn KeyValueStorage>,
    data: RwLock<Option<SessionData>>,
}

impl Session {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            data: RwLock::new(None),
        }
    }

    /// Hydrate from storage. Returns true when a non-expired session was
    /// restored; an expired or malformed persisted session is removed.
    pub fn load(&self) -> bool {
        let Some(raw) = self.storage.get(SESSION_KEY) else {
            return false;
        };

        match serde_json::from_str::<SessionData>(&raw) {
            Ok(data) if !data.is_expired() => {
                let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
                *guard = Some(data);
                true
            }
            Ok(_) => {
                self.storage.remove(SESSION_KEY);
                false
            }
            Err(err) => {
                warn!(error = %err, "Discarding malformed persisted session");
                self.storage.remove(SESSION_KEY);
                false
            }
        }
    }

    /// Replace the session after a successful login and persist it.
    pub fn update(&self, data: SessionData) {
        match serde_json::to_string(&data) {
            Ok(raw) => self.storage.set(SESSION_KEY, &raw),
            Err(err) => warn!(error = %err, "Failed to serialize session"),
        }
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(data);
    }

    /// Drop the session and its persisted copy. Called on logout and on
    /// auth-state loss, alongside the stores' `clear_state`.
    pub fn clear(&self) {
        let mut guard = self.data.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        self.storage.remove(SESSION_KEY);
    }

    pub fn user(&self) -> Option<UserProfile> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|d| d.user.clone())
    }

    pub fn is_valid(&self) -> bool {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }
}

impl TokenProvider for Session {
    fn token(&self) -> Option<String> {
        let guard = self.data.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|d| !d.is_expired())
            .map(|d| d.token.clone())
    }
}
