//! Session flags read from the client-side key-value store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login and logout flows write two entries: the auth token and a JSON blob
//! describing the user. Navigation only reads them, once per navigation, and
//! hands the derived [`SessionFlags`] to the guard.
//!
//! TRADE-OFFS
//! ==========
//! A token with an unreadable user blob is ambiguous. The default policy keeps
//! the session and falls back to the `user` role; `ForceLogout` clears both
//! entries instead.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::router::Role;

/// Storage key of the auth token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Storage key of the JSON-encoded user info.
pub const USER_INFO_KEY: &str = "user_info";

/// Errors raised by session stores.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session store io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file or a stored value is not valid JSON.
    #[error("session data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored user info decoded to JSON `null`.
    #[error("stored user info is null")]
    NullUserInfo,
}

/// String key-value store holding session entries.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store, useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Store persisted as a flat JSON object of strings in one file.
///
/// The file is re-read on every access so separate processes see each
/// other's writes. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// FLAGS
// =============================================================================

/// What to do when the token is present but the user info cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedSessionPolicy {
    /// Stay signed in with the `user` role.
    #[default]
    KeepSession,
    /// Clear both entries and treat the visitor as anonymous.
    ForceLogout,
}

/// Authentication flags consumed by the navigation guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub authenticated: bool,
    pub role: Role,
}

impl SessionFlags {
    #[must_use]
    pub fn new(authenticated: bool, role: Role) -> Self {
        Self { authenticated, role }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Derive flags from `store`.
    ///
    /// `authenticated` is true when a token entry exists. The role comes from
    /// the user info's `role` field and defaults to `user`. An empty user-info
    /// entry counts as absent.
    pub fn load(store: &dyn SessionStore, policy: MalformedSessionPolicy) -> Self {
        let authenticated = store.get(AUTH_TOKEN_KEY).is_some();
        let Some(raw) = store.get(USER_INFO_KEY).filter(|raw| !raw.is_empty()) else {
            return Self::new(authenticated, Role::User);
        };

        match parse_role(&raw) {
            Ok(role) => Self::new(authenticated, role),
            Err(e) => match policy {
                MalformedSessionPolicy::KeepSession => {
                    tracing::warn!(error = %e, "malformed user info; defaulting role to user");
                    Self::new(authenticated, Role::User)
                }
                MalformedSessionPolicy::ForceLogout => {
                    tracing::warn!(error = %e, "malformed user info; clearing session");
                    if let Err(e) = clear_session(store) {
                        tracing::warn!(error = %e, "failed to clear session");
                    }
                    Self::anonymous()
                }
            },
        }
    }
}

/// Extract the role from a stored user-info blob.
///
/// A missing, empty, or non-string `role` is the `user` role.
///
/// # Errors
///
/// Fails when `raw` is not JSON or is JSON `null`.
pub fn parse_role(raw: &str) -> Result<Role, SessionError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_null() {
        return Err(SessionError::NullUserInfo);
    }
    Ok(value
        .get("role")
        .and_then(Value::as_str)
        .filter(|role| !role.is_empty())
        .map_or(Role::User, Role::parse))
}

/// Remove both session entries.
///
/// # Errors
///
/// Returns the first store error encountered.
pub fn clear_session(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.remove(AUTH_TOKEN_KEY)?;
    store.remove(USER_INFO_KEY)
}
