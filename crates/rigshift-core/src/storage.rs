use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;
use crate::parts::{BuildState, ComponentCategory};

/// Slot holding the saved `{current, new}` build pair.
pub const CONFIG_SLOT: &str = "pcBuilderConfig";

/// Named-slot key/value storage. Each write replaces the whole slot.
pub trait SlotStore: Send + Sync {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
    fn contains(&self, slot: &str) -> Result<bool, StorageError>;
}

fn io_err(slot: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        slot: slot.to_string(),
        source,
    }
}

/// Write `contents` to `.<name>.tmp` beside `path`, then rename it into
/// place. Missing parent directories are created.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let tmp = dir.join(format!(".{name}.tmp"));
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

/// One `<slot>.json` file per slot under a directory.
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the global data directory (~/.rigshift/).
    pub fn default_location() -> Self {
        Self::new(crate::data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStore for FileSlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(slot)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(slot)(e)),
        }
    }

    /// A reader never sees a half-written slot.
    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        write_atomic(&self.path(slot), value).map_err(io_err(slot))
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(slot)(e)),
        }
    }

    fn contains(&self, slot: &str) -> Result<bool, StorageError> {
        Ok(self.path(slot).is_file())
    }
}

/// In-process store, used by tests and embedders with no disk access.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SlotStore for MemorySlotStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots().get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.slots().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        self.slots().remove(slot);
        Ok(())
    }

    fn contains(&self, slot: &str) -> Result<bool, StorageError> {
        Ok(self.slots().contains_key(slot))
    }
}

// --- Saved configuration ---

/// Durable form: `{"current": [[category, description], ...], "new": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedConfiguration {
    current: Vec<(String, String)>,
    new: Vec<(String, String)>,
}

fn to_pairs(build: &BuildState) -> Vec<(String, String)> {
    build
        .iter()
        .map(|(c, d)| (c.tag().to_string(), d.to_string()))
        .collect()
}

fn from_pairs(pairs: &[(String, String)], which: &str) -> BuildState {
    let mut build = BuildState::new();
    for (tag, description) in pairs {
        match tag.parse::<ComponentCategory>() {
            Ok(category) if !description.trim().is_empty() => build.set_part(category, description),
            Ok(category) => {
                tracing::warn!(build = which, %category, "skipping saved part with empty description");
            }
            Err(_) => {
                tracing::warn!(build = which, category = %tag, "skipping saved part with unknown category");
            }
        }
    }
    build
}

/// Save both builds to [`CONFIG_SLOT`], overwriting any previous value.
pub fn save(store: &dyn SlotStore, current: &BuildState, new: &BuildState) -> Result<(), StorageError> {
    let config = PersistedConfiguration {
        current: to_pairs(current),
        new: to_pairs(new),
    };
    let json = serde_json::to_string(&config).map_err(|source| StorageError::Encode {
        slot: CONFIG_SLOT.to_string(),
        source,
    })?;
    store.write(CONFIG_SLOT, &json)?;
    tracing::info!(slot = CONFIG_SLOT, "saved build configuration");
    Ok(())
}

/// Load the saved `(current, new)` builds. Returns `None` when nothing is
/// saved. Malformed contents are logged, cleared, and also yield `None`.
pub fn load(store: &dyn SlotStore) -> Result<Option<(BuildState, BuildState)>, StorageError> {
    let Some(raw) = store.read(CONFIG_SLOT)? else {
        return Ok(None);
    };
    match serde_json::from_str::<PersistedConfiguration>(raw.trim()) {
        Ok(config) => {
            let current = from_pairs(&config.current, "current");
            let new = from_pairs(&config.new, "new");
            tracing::info!(slot = CONFIG_SLOT, "loaded build configuration");
            Ok(Some((current, new)))
        }
        Err(e) => {
            tracing::warn!(slot = CONFIG_SLOT, "corrupt saved configuration, clearing: {e}");
            store.remove(CONFIG_SLOT)?;
            Ok(None)
        }
    }
}

/// Whether a configuration is saved, without decoding it.
pub fn has_saved(store: &dyn SlotStore) -> Result<bool, StorageError> {
    store.contains(CONFIG_SLOT)
}
