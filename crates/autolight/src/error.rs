use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutolightError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::db::DatabaseError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl AutolightError {
    /// Whether the user can reasonably try the same action again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Settings validation failed: {message}")]
    Validation { message: String },
}

/// Problems with user input, surfaced inline and never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name cannot be empty")]
    EmptyProjectName,

    #[error("Only .dwg and .dxf files are allowed (got '{0}')")]
    UnsupportedExtension(String),

    #[error("File is empty")]
    EmptyFile,

    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },
}

/// A selection referenced something absent from the loaded session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Fixture model '{0}' is not in the loaded catalog")]
    UnknownModel(String),

    #[error("Fixture '{0}' is not part of this project")]
    UnknownFixture(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to render PDF: {0}")]
    PdfRendering(String),

    #[error("Failed to render CSV: {0}")]
    CsvRendering(#[from] csv::Error),

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AutolightError>;
