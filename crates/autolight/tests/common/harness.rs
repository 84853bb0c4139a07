//! Test harness for isolated test execution.
//!
//! Each harness owns a temporary directory holding the database file, the
//! settings file and the export directory.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use autolight::catalog::seed_sample_catalog;
use autolight::config::{save_settings, Settings};
use autolight::detector::RandomizedDetector;
use autolight::progress::NoopProgress;
use autolight::upload::{self, UploadOutcome, UploadRequest};
use autolight::{Database, OwnerId};

pub struct TestHarness {
    temp_dir: TempDir,
    pub db: Database,
    pub owner: OwnerId,
    pub settings: Settings,
    pub settings_path: PathBuf,
    pub export_dir: PathBuf,
}

impl TestHarness {
    /// Creates a harness with an empty catalog.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let db_path = base.join("data").join("autolight.db");
        let export_dir = base.join("reports");
        let settings_path = base.join("settings.json");

        let settings = Settings {
            database_path: Some(db_path.to_string_lossy().into_owned()),
            export_directory: export_dir.to_string_lossy().into_owned(),
            ..Settings::default()
        };
        save_settings(&settings_path, &settings).expect("Failed to write settings");

        let db = Database::open(&db_path).expect("Failed to open database");

        Self {
            temp_dir,
            db,
            owner: OwnerId::new("architect-1"),
            settings,
            settings_path,
            export_dir,
        }
    }

    /// Creates a harness with the built-in sample catalog loaded.
    pub fn with_sample_catalog() -> Self {
        let harness = Self::new();
        seed_sample_catalog(&harness.db).expect("Failed to seed catalog");
        harness
    }

    /// Uploads a project through the randomized detector with a fixed seed.
    pub fn upload(&self, project_name: &str, seed: u64) -> UploadOutcome {
        let request = UploadRequest {
            project_name: project_name.to_string(),
            file_name: format!("{}.dxf", project_name.to_lowercase().replace(' ', "_")),
            size: 4096,
        };
        upload::process(
            &self.db,
            &self.owner,
            &request,
            &mut RandomizedDetector::seeded(seed),
            self.settings.max_upload_bytes,
            &NoopProgress,
        )
        .expect("Upload failed")
    }

    pub fn base(&self) -> &std::path::Path {
        self.temp_dir.path()
    }
}
