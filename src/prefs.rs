use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const DARK_MODE_KEY: &str = "darkMode";

/// Minimal persisted key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Flat JSON object on disk, rewritten on every `set`
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::prefs_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Map<String, Value> {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Map<String, Value>>(&bytes).ok())
            .unwrap_or_default()
    }
}

impl Default for FileKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all().remove(key)? {
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut all = self.read_all();
        all.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&all)?;
        fs::write(&self.path, data)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persisted dark theme flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemePreference {
    pub dark: bool,
}

impl ThemePreference {
    /// Missing or unreadable values mean light theme
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let dark = store
            .get(DARK_MODE_KEY)
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);
        Self { dark }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> io::Result<()> {
        store.set(DARK_MODE_KEY, if self.dark { "true" } else { "false" })
    }

    /// Flips the theme and persists it. The flag is left alone when the
    /// write fails.
    pub fn toggle(&mut self, store: &mut dyn KeyValueStore) -> io::Result<()> {
        let flipped = Self { dark: !self.dark };
        flipped.save(store)?;
        *self = flipped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_light_when_absent() {
        let store = MemoryStore::default();

        assert!(!ThemePreference::load(&store).dark);
    }

    #[test]
    fn garbage_value_defaults_to_light() {
        let mut store = MemoryStore::default();
        store.set(DARK_MODE_KEY, "maybe").unwrap();

        assert!(!ThemePreference::load(&store).dark);
    }

    #[test]
    fn toggle_persists_each_change() {
        let mut store = MemoryStore::default();
        let mut pref = ThemePreference::load(&store);

        pref.toggle(&mut store).unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("true"));

        pref.toggle(&mut store).unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
        assert!(!pref.dark);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn failed_write_keeps_theme() {
        let mut store = ReadOnlyStore;
        let mut pref = ThemePreference::load(&store);

        let err = pref.toggle(&mut store).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(!pref.dark);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs").join("prefs.json");
        let mut store = FileKeyValueStore::with_path(&path);

        assert_eq!(store.get(DARK_MODE_KEY), None);
        store.set(DARK_MODE_KEY, "true").unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileKeyValueStore::with_path(&path);
        assert_eq!(reopened.get(DARK_MODE_KEY).as_deref(), Some("true"));
        assert_eq!(reopened.get("other").as_deref(), Some("value"));
        assert!(ThemePreference::load(&reopened).dark);
    }

    #[test]
    fn file_store_reads_json_booleans() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{ "darkMode": true }"#).unwrap();

        let store = FileKeyValueStore::with_path(&path);
        assert!(ThemePreference::load(&store).dark);
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{{{").unwrap();

        let mut store = FileKeyValueStore::with_path(&path);
        assert_eq!(store.get(DARK_MODE_KEY), None);

        store.set(DARK_MODE_KEY, "false").unwrap();
        assert_eq!(store.get(DARK_MODE_KEY).as_deref(), Some("false"));
    }
}
