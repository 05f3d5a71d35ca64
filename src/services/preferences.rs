//! Persisted minute preferences for each machine

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, info, warn};

/// Storage for the per-machine default durations, in whole minutes
pub trait PreferenceStore: Send + Sync {
    /// Stored minutes for `key`, or `None` when nothing usable is stored
    fn get_minutes(&self, key: &str) -> Option<u32>;

    /// Store minutes for `key`
    fn set_minutes(&self, key: &str, minutes: u32) -> Result<(), String>;
}

/// Validate user-entered minutes.
///
/// Empty, non-numeric and zero input is rejected so that a machine never
/// receives a zero-length countdown.
pub fn parse_minutes(input: &str) -> Result<u32, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Please enter some minutes".to_string());
    }

    let minutes: u32 = trimmed
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of minutes", trimmed))?;

    if minutes == 0 {
        return Err("The timer needs more than 0 minutes".to_string());
    }

    Ok(minutes)
}

/// Default location of the preference file
pub fn default_preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("laundry-timer").join("preferences.json"))
}

/// Preference store kept in memory only
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, u32>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_minutes(&self, key: &str) -> Option<u32> {
        let values = self.values.lock().ok()?;
        values.get(key).copied().filter(|minutes| *minutes != 0)
    }

    fn set_minutes(&self, key: &str, minutes: u32) -> Result<(), String> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| format!("Failed to lock preferences: {}", e))?;
        values.insert(key.to_string(), minutes);
        Ok(())
    }
}

/// Preference store persisted as a small JSON object, e.g. `{"washer": 40}`
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, i64>>,
}

impl JsonPreferenceStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and treated as empty too, so every machine falls back to its
    /// built-in default.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match load_values(&path) {
            Ok(values) => {
                debug!("Loaded {} preference(s) from {}", values.len(), path.display());
                values
            }
            Err(e) => {
                warn!("Ignoring preference file: {}", e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, values: &BTreeMap<String, i64>) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                format!("Failed to create directory {}: {}", parent.display(), e)
            })?;
        }

        let contents = serde_json::to_string_pretty(values)
            .map_err(|e| format!("Failed to serialize preferences: {}", e))?;

        fs::write(&self.path, contents)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get_minutes(&self, key: &str) -> Option<u32> {
        let values = self.values.lock().ok()?;
        let stored = *values.get(key)?;
        match u32::try_from(stored) {
            Ok(minutes) if minutes != 0 => Some(minutes),
            _ => {
                if stored != 0 {
                    warn!("Ignoring invalid stored minutes for {}: {}", key, stored);
                }
                None
            }
        }
    }

    fn set_minutes(&self, key: &str, minutes: u32) -> Result<(), String> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| format!("Failed to lock preferences: {}", e))?;

        // Only keep the new value once it is on disk
        let mut updated = values.clone();
        updated.insert(key.to_string(), i64::from(minutes));
        self.save(&updated)?;
        *values = updated;

        info!("Saved {} minutes for {} to {}", minutes, key, self.path.display());
        Ok(())
    }
}

fn load_values(path: &Path) -> Result<BTreeMap<String, i64>, String> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
