use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;

pub const SETTINGS_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    /// Falls back to `~/.autolight/data/autolight.db` when unset.
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default = "default_export_directory")]
    pub export_directory: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database_path
            .as_ref()
            .map(PathBuf::from)
            .or_else(crate::db::default_database_path)
    }

    pub fn export_directory(&self) -> PathBuf {
        PathBuf::from(&self.export_directory)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION.to_string(),
            database_path: None,
            export_directory: default_export_directory(),
            theme: Theme::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_filter: default_log_filter(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_export_directory() -> String {
    dirs::home_dir()
        .map(|h| h.join(".autolight").join("reports"))
        .unwrap_or_else(|| PathBuf::from("reports"))
        .to_string_lossy()
        .into_owned()
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
