//! Persisted identity and data-source mode.
//!
//! Values are opaque strings behind a [`LocalStore`]; the typed accessors
//! below treat anything unreadable as unset, so a corrupted record falls
//! back to the defaults instead of failing a request.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use journal_core::{AccessState, UiMode};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Key of the access identity record.
pub const ACCESS_KEY: &str = "journal_access_v1";

/// Key of the data-source mode flag.
pub const MODE_KEY: &str = "journal_ui_mode_v1";

/// String key/value storage that survives restarts.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key under a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating `dir` if needed.
    pub fn init(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("could not read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stored identity, or [`AccessState::default`] when unset or unreadable.
pub fn read_access(store: &dyn LocalStore) -> AccessState {
    let Some(raw) = store.get(ACCESS_KEY) else {
        return AccessState::default();
    };
    match serde_json::from_str(&raw) {
        Ok(access) => access,
        Err(e) => {
            debug!("ignoring unreadable access record: {}", e);
            AccessState::default()
        }
    }
}

pub fn write_access(store: &dyn LocalStore, access: &AccessState) -> Result<(), StoreError> {
    let raw = serde_json::to_string(access)?;
    store.set(ACCESS_KEY, &raw)
}

/// `Api` only when the stored flag says so; everything else is `Demo`.
pub fn get_mode(store: &dyn LocalStore) -> UiMode {
    store
        .get(MODE_KEY)
        .and_then(|raw| {
            let raw = raw.trim();
            serde_json::from_str::<UiMode>(raw)
                .ok()
                // Older records hold the bare word rather than a JSON string.
                .or_else(|| (raw == "api").then_some(UiMode::Api))
        })
        .unwrap_or_default()
}

pub fn set_mode(store: &dyn LocalStore, mode: UiMode) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&mode)?;
    store.set(MODE_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::Role;

    #[test]
    fn defaults_when_unset() {
        let store = MemoryStore::new();
        assert_eq!(read_access(&store), AccessState::default());
        assert_eq!(get_mode(&store), UiMode::Demo);
    }

    #[test]
    fn unreadable_access_falls_back_to_default() {
        let store = MemoryStore::new();
        for raw in [
            "",
            "not json",
            "{",
            "[]",
            "null",
            r#"{"role":"ROOT","telegram_user_id":1}"#,
            r#"{"role":"ADMIN","telegram_user_id":null}"#,
            r#"{"role":"ADMIN"}"#,
            r#"{"role":"ADMIN","telegram_user_id":"twelve"}"#,
        ] {
            store.set(ACCESS_KEY, raw).unwrap();
            assert_eq!(read_access(&store), AccessState::default(), "raw {:?}", raw);
        }
    }

    #[test]
    fn string_identity_is_read_as_a_number() {
        let store = MemoryStore::new();
        store
            .set(ACCESS_KEY, r#"{"role":"ADMIN","telegram_user_id":"12"}"#)
            .unwrap();
        assert_eq!(read_access(&store), AccessState::new(Role::Admin, 12));
    }

    #[test]
    fn access_round_trips() {
        let store = MemoryStore::new();
        let access = AccessState::new(Role::Admin, 77);
        write_access(&store, &access).unwrap();
        assert_eq!(read_access(&store), access);
    }

    #[test]
    fn mode_reads_only_api_as_api() {
        let store = MemoryStore::new();
        for (raw, expected) in [
            (r#""api""#, UiMode::Api),
            ("api", UiMode::Api),
            (r#""demo""#, UiMode::Demo),
            ("API", UiMode::Demo),
            ("garbage", UiMode::Demo),
        ] {
            store.set(MODE_KEY, raw).unwrap();
            assert_eq!(get_mode(&store), expected, "raw {:?}", raw);
        }

        set_mode(&store, UiMode::Api).unwrap();
        assert_eq!(get_mode(&store), UiMode::Api);
        set_mode(&store, UiMode::Demo).unwrap();
        assert_eq!(get_mode(&store), UiMode::Demo);
    }
}
