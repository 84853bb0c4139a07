//! Domain records shared by the store, the selection workflow and the exporters.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of the caller on whose behalf project-scoped store calls run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// CAD source formats accepted at upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFileType {
    Dwg,
    Dxf,
}

impl SourceFileType {
    /// Case-insensitive match on a bare extension (no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "dwg" => Some(Self::Dwg),
            "dxf" => Some(Self::Dxf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dwg => "dwg",
            Self::Dxf => "dxf",
        }
    }
}

impl FromStr for SourceFileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown source file type '{}'", s))
    }
}

/// Output formats for exported reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Processing state of an uploaded project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether processing has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown project status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub source_file_name: String,
    pub source_file_type: SourceFileType,
    pub total_fixtures: i64,
    pub total_cost: Decimal,
    pub average_lux: f64,
    pub status: ProjectStatus,
    /// Why processing failed; only set for [`ProjectStatus::Failed`].
    pub error_message: Option<String>,
    pub owner_id: OwnerId,
    pub created_at: String,
    /// When processing finished, successfully or not.
    pub processed_at: Option<String>,
}

/// Fields supplied when creating a project; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub source_file_name: String,
    pub source_file_type: SourceFileType,
}

/// Immutable catalog entry describing a purchasable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureModel {
    pub id: String,
    pub model_name: String,
    pub manufacturer: String,
    pub fixture_type: String,
    pub wattage: f64,
    pub lumens: i64,
    pub unit_price: Decimal,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewFixtureModel {
    pub model_name: String,
    pub manufacturer: String,
    pub fixture_type: String,
    pub wattage: f64,
    pub lumens: i64,
    pub unit_price: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: String,
    pub project_id: String,
    pub room_name: String,
    pub detected_symbol: String,
    pub selected_model_id: Option<String>,
    pub quantity: u32,
    pub lux_level: f64,
    pub created_at: String,
}

/// A fixture produced by detection, before the store assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFixture {
    pub room_name: String,
    pub detected_symbol: String,
    pub selected_model_id: Option<String>,
    pub quantity: u32,
    pub lux_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureRecommendation {
    pub id: String,
    pub fixture_id: String,
    pub recommended_model_id: String,
    pub reason: String,
    pub priority: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub project_id: String,
    pub format: ReportFormat,
    pub file_name: String,
    pub generated_at: String,
}
