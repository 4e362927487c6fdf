use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "RIGSHIFT_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
        }
    }
}

pub fn settings_path() -> PathBuf {
    crate::data_dir().join("settings.json")
}

/// Read settings from the default location, applying the env override.
pub fn read_settings() -> AiSettings {
    with_env_key(read_settings_from(&settings_path()))
}

/// Apply the `RIGSHIFT_API_KEY` override, if set.
pub fn with_env_key(mut settings: AiSettings) -> AiSettings {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            settings.api_key = key.trim().to_string();
        }
    }
    settings
}

/// Missing or unreadable settings fall back to defaults.
pub fn read_settings_from(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    match fs::read_to_string(path).map(|s| serde_json::from_str::<AiSettings>(&s)) {
        Ok(Ok(settings)) => settings,
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), "ignoring malformed settings: {e}");
            AiSettings::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot read settings: {e}");
            AiSettings::default()
        }
    }
}

/// Replace the settings file atomically.
pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::storage::write_atomic(path, &json).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), provider = %settings.provider, "settings saved");
    Ok(())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
