pub mod catalog;
pub mod config;
pub mod cost;
pub mod db;
pub mod detector;
pub mod error;
pub mod export;
pub mod model;
pub mod progress;
pub mod repository;
pub mod selection;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod upload;

pub use catalog::{seed_sample_catalog, CatalogCache};
pub use config::{load_settings, save_settings, LogFormat, Settings, Theme};
pub use db::{Database, DatabaseError};
pub use detector::{FixtureDetector, RandomizedDetector};
pub use error::{
    AutolightError, ConfigError, ExportError, ReferenceError, Result, ValidationError,
};
pub use export::{write_report, ExportTable};
pub use model::{
    Fixture, FixtureModel, FixtureRecommendation, OwnerId, Project, ProjectStatus, Report,
    ReportFormat, SourceFileType,
};
pub use progress::{NoopProgress, ProgressEvent, ProgressReporter};
pub use repository::RecordStore;
pub use selection::{SelectedFixture, SelectionState};
pub use session::ResultsSession;
pub use state::{AppState, Page};
pub use upload::{UploadOutcome, UploadRequest};
