pub mod catalog;
pub mod error;
pub mod export;
pub mod parts;
pub mod rules;
pub mod settings;
pub mod storage;
pub mod tutorial;
pub mod workbench;

use std::path::PathBuf;

pub use error::{ExportError, SettingsError, StorageError};
pub use export::{ExportFormat, ExportedDocument};
pub use parts::{BuildKind, BuildState, ComponentCategory, PcParts};
pub use rules::{check_compatibility, CompatibilityWarning};
pub use settings::{
    ai_configured, read_settings, read_settings_from, settings_path, with_env_key, write_settings_to,
    AiSettings,
};
pub use storage::{FileSlotStore, MemorySlotStore, SlotStore};
pub use tutorial::{TutorialResponse, TutorialStep};
pub use workbench::Workbench;

/// Resolve the global data directory (~/.rigshift/).
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rigshift")
}
