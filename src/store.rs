//! File-backed key/value store for small user preferences.
//!
//! Values are kept as serialized JSON text under their key, so one bad entry never
//! poisons the others. Reads fall back to the caller's default and writes never fail
//! loudly; every problem is logged and swallowed.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            write_lock: Mutex::new(()),
        }
    }

    /// A store with no backing medium: reads yield defaults, writes are dropped.
    pub fn unavailable() -> Self {
        Self {
            path: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::new(p),
            None => Self::unavailable(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(path) = self.path.as_deref() else {
            return default;
        };
        let Ok(Some(entries)) = load_entries(path) else {
            return default;
        };
        let Some(raw) = entries.get(key) else {
            return default;
        };
        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error parsing stored value for key \"{}\": {}", key, e);
                default
            }
        }
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                error!("Error storing value for key \"{}\": {}", key, e);
                return;
            }
        };
        self.update(path, key, |entries| {
            entries.insert(key.to_string(), serialized);
        });
    }

    pub fn remove(&self, key: &str) {
        let Some(path) = self.path.as_deref() else {
            return;
        };
        self.update(path, key, |entries| {
            entries.remove(key);
        });
    }

    fn update(&self, path: &Path, key: &str, apply: impl FnOnce(&mut Entries)) {
        let _guard = match self.write_lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut entries = match load_entries(path) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                // Never rewrite an unreadable file from an empty map.
                error!("Not storing key \"{}\": preference file unreadable: {}", key, e);
                return;
            }
        };
        apply(&mut entries);
        if let Err(e) = save_entries(path, &entries) {
            error!("Error storing value for key \"{}\": {}", key, e);
        }
    }
}

/// `Ok(None)` when the file is missing or not a JSON object of strings; a corrupt
/// file is replaced by the next write. `Err` when it exists but cannot be read.
fn load_entries(path: &Path) -> std::io::Result<Option<Entries>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Preference file {:?} does not exist yet", path);
            return Ok(None);
        }
        Err(e) => {
            warn!("Failed to read preference file {:?}: {}", path, e);
            return Err(e);
        }
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Ok(Some(entries)),
        Err(e) => {
            warn!("Preference file {:?} is corrupt: {}", path, e);
            Ok(None)
        }
    }
}

/// Writes a sibling temp file and renames it over `path`, so readers see either the
/// old or the new content.
fn save_entries(path: &Path, entries: &Entries) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let content = serde_json::to_string_pretty(entries)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
