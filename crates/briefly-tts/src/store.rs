//! Preference store adapters.
//!
//! - [`MemoryPreferenceStore`]: in-process map, nothing survives the process.
//! - [`JsonFilePreferenceStore`]: a flat JSON object on disk, rewritten on
//!   every `set`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use briefly_core::{PreferenceError, PreferenceStore};

/// Volatile preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PreferenceError::Unavailable("preference map poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preference store backed by a JSON file of string values.
///
/// The file is read once on open. A missing file is an empty store; a file
/// that cannot be parsed is logged and replaced on the next write.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        tracing::debug!(path = %path.display(), count = entries.len(), "Opened preference file");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| PreferenceError::Serialize(e.to_string()))?;

        // Write to a sibling and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PreferenceError::Unavailable("preference map poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        self.write(&entries)
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read preference file");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt preference file");
        BTreeMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use briefly_core::{Preferences, RATE_KEY, VOICE_KEY};

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryPreferenceStore::new();
        assert!(store.get(RATE_KEY).is_none());
        store.set(RATE_KEY, "1.5").unwrap();
        assert_eq!(store.get(RATE_KEY).as_deref(), Some("1.5"));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let store = JsonFilePreferenceStore::open(&path);
        store.set(RATE_KEY, "1.25").unwrap();
        store.set(VOICE_KEY, "v1").unwrap();
        drop(store);

        let reopened = JsonFilePreferenceStore::open(&path);
        let prefs = Preferences::load(&reopened);
        assert_eq!(prefs.rate, Some(1.25));
        assert_eq!(prefs.voice_id.as_deref(), Some("v1"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePreferenceStore::open(dir.path().join("preferences.json"));
        assert!(store.get(VOICE_KEY).is_none());
    }

    #[test]
    fn corrupt_file_is_treated_as_empty_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ nope").unwrap();

        let store = JsonFilePreferenceStore::open(&path);
        assert!(store.get(RATE_KEY).is_none());

        store.set(RATE_KEY, "0.75").unwrap();
        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get(RATE_KEY).map(String::as_str), Some("0.75"));
    }
}
