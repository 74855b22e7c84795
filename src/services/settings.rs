//! Persisted timer settings: last-used duration and the auto-repeat flag

use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::TimerDuration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub last_duration: TimerDuration,
    pub auto_repeat: bool,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            last_duration: TimerDuration::new(0, 5, 0),
            auto_repeat: false,
        }
    }
}

/// Key-value store the engine reads at construction and writes back to
pub trait SettingsStore: Send + Sync + 'static {
    fn load(&self) -> PersistedSettings;
    fn save_duration(&self, duration: TimerDuration) -> Result<()>;
    fn save_auto_repeat(&self, enabled: bool) -> Result<()>;
}

/// Settings kept in a JSON file
pub struct JsonSettingsStore {
    path: PathBuf,
    data: RwLock<PersistedSettings>,
}

impl JsonSettingsStore {
    /// Open the store, falling back to defaults when the file is missing or unreadable
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                PersistedSettings::default()
            })
        } else {
            debug!("No settings at {}, using defaults", path.display());
            PersistedSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn update(&self, updater: impl FnOnce(&mut PersistedSettings)) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        updater(&mut *guard);
        let serialized = serde_json::to_string_pretty(&*guard)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> PersistedSettings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save_duration(&self, duration: TimerDuration) -> Result<()> {
        self.update(|settings| settings.last_duration = duration)
    }

    fn save_auto_repeat(&self, enabled: bool) -> Result<()> {
        self.update(|settings| settings.auto_repeat = enabled)
    }
}

/// Settings held in memory only
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    data: RwLock<PersistedSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: PersistedSettings) -> Self {
        Self {
            data: RwLock::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> PersistedSettings {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save_duration(&self, duration: TimerDuration) -> Result<()> {
        self.data.write().unwrap_or_else(PoisonError::into_inner).last_duration = duration;
        Ok(())
    }

    fn save_auto_repeat(&self, enabled: bool) -> Result<()> {
        self.data.write().unwrap_or_else(PoisonError::into_inner).auto_repeat = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("countdown-alarm-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = JsonSettingsStore::new(path).unwrap();
        assert_eq!(store.load(), PersistedSettings::default());
    }

    #[test]
    fn writes_survive_reopening() {
        let path = temp_path("roundtrip");
        let store = JsonSettingsStore::new(path.clone()).unwrap();
        store.save_duration(TimerDuration::new(1, 2, 3)).unwrap();
        store.save_auto_repeat(true).unwrap();

        let reopened = JsonSettingsStore::new(path.clone()).unwrap();
        assert_eq!(
            reopened.load(),
            PersistedSettings {
                last_duration: TimerDuration::new(1, 2, 3),
                auto_repeat: true,
            }
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "not json").unwrap();
        let store = JsonSettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.load(), PersistedSettings::default());
        let _ = fs::remove_file(&path);
    }
}
