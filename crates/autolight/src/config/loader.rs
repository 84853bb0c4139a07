use std::path::{Path, PathBuf};

use crate::config::schema::{Settings, SETTINGS_VERSION};
use crate::error::ConfigError;

/// `~/.autolight/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".autolight").join("settings.json"))
}

pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_settings_from_str(&content)
}

/// Loads settings, or returns the defaults when the file does not exist yet.
pub fn load_settings_or_default<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        log::debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    load_settings(path)
}

pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = serde_json::from_str(content)?;

    validate_settings(&settings)?;

    Ok(settings)
}

pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<(), ConfigError> {
    let path = path.as_ref();
    validate_settings(settings)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Saved settings to {}", path.display());
    Ok(())
}

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.version != SETTINGS_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported settings version: {}", settings.version),
        });
    }

    if settings.max_upload_bytes == 0 {
        return Err(ConfigError::Validation {
            message: "max_upload_bytes must be positive".to_string(),
        });
    }

    if settings.export_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "export_directory cannot be empty".to_string(),
        });
    }

    if settings.database_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "database_path cannot be empty when set".to_string(),
        });
    }

    Ok(())
}
