use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::warn;

use crate::error::Result;

/// String key-value slots that survive restarts, in the manner of browser
/// local storage. Every write is durable before the call returns.
pub trait SlotStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// All slots live in one JSON object file.
pub struct FileStorage {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the file leniently: a missing file starts empty and an unreadable
    /// one is reported and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(text) if text.trim().is_empty() => BTreeMap::new(),
                Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                    warn!("storage file {} is corrupt, starting empty: {}", path.display(), err);
                    BTreeMap::new()
                }),
                Err(err) => {
                    warn!("could not read storage file {}, starting empty: {}", path.display(), err);
                    BTreeMap::new()
                }
            }
        } else {
            if let Some(parent) = path.parent() {
                if let Err(err) = fs::create_dir_all(parent) {
                    warn!("could not create storage directory {}: {}", parent.display(), err);
                }
            }
            BTreeMap::new()
        };

        FileStorage {
            path,
            slots: Mutex::new(slots),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SlotStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.lock();
        slots.insert(key.to_string(), value.to_string());
        self.flush(&slots)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut slots = self.lock();
        if slots.remove(key).is_some() {
            self.flush(&slots)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}
