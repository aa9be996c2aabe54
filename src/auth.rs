//! Credential lookup for backend calls.
//!
//! The submission coordinator never reads ambient storage directly; it is
//! handed a [`CredentialProvider`] at construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};

use crate::error::StorageError;

/// Keys a bearer token may be cached under, in preference order.
pub const TOKEN_KEYS: [&str; 3] = ["access_token", "token", "healthhub_token"];

/// Source of the bearer token for backend requests.
pub trait CredentialProvider: Send + Sync {
    /// The current token, or `None` when the user is signed out.
    fn token(&self) -> Option<SecretString>;
}

/// A fixed token (or none).
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(SecretString::from(token)))
        }
    }

    pub fn from_secret(token: SecretString) -> Self {
        if token.expose_secret().trim().is_empty() {
            Self(None)
        } else {
            Self(Some(token))
        }
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<SecretString> {
        self.0.clone()
    }
}

/// Key/value credential cache, optionally mirrored to a JSON file.
pub struct TokenStore {
    entries: RwLock<HashMap<String, String>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// In-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Load from a JSON object file. A missing file yields an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "Loaded credential store");
        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    /// Store a value and persist when file-backed.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            entries.insert(key.to_string(), value.to_string());
        }
        self.persist()
    }

    /// Remove every known token key (sign out).
    pub fn clear_tokens(&self) -> Result<(), StorageError> {
        {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            for key in TOKEN_KEYS {
                entries.remove(key);
            }
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            serde_json::to_string_pretty(&*entries)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for TokenStore {
    fn token(&self) -> Option<SecretString> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        TOKEN_KEYS
            .iter()
            .filter_map(|key| entries.get(*key))
            .find(|value| !value.trim().is_empty())
            .map(|value| SecretString::from(value.clone()))
    }
}

/// Convenience for logging whether a token is present without exposing it.
pub fn describe(token: Option<&SecretString>) -> &'static str {
    match token {
        Some(t) if !t.expose_secret().is_empty() => "present",
        _ => "absent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_checked_in_preference_order() {
        let store = TokenStore::new();
        store.set("healthhub_token", "third").unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "third");

        store.set("token", "second").unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "second");

        store.set("access_token", "first").unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "first");
    }

    #[test]
    fn blank_values_are_skipped() {
        let store = TokenStore::new();
        store.set("access_token", "  ").unwrap();
        store.set("token", "real").unwrap();
        assert_eq!(store.token().unwrap().expose_secret(), "real");
    }

    #[test]
    fn empty_store_has_no_token() {
        assert!(TokenStore::new().token().is_none());
        assert!(StaticToken::none().token().is_none());
        assert!(StaticToken::new("").token().is_none());
        assert_eq!(describe(None), "absent");
    }

    #[test]
    fn file_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let store = TokenStore::open(&path).unwrap();
        assert!(store.token().is_none());
        store.set("token", "abc123").unwrap();

        let reopened = TokenStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "abc123");

        reopened.clear_tokens().unwrap();
        assert!(TokenStore::open(&path).unwrap().token().is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TokenStore::open(&path),
            Err(StorageError::Serialization(_))
        ));
    }
}
