//! Report export: a tabular snapshot of the current selection rendered as
//! PDF or CSV.

pub mod csv_report;
pub mod pdf_report;
pub mod table;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

pub use table::{format_money, ExportTable};

use crate::error::{ExportError, Result};
use crate::model::{Report, ReportFormat};
use crate::repository::ReportRepository;
use crate::session::ResultsSession;

/// A rendered report ready to be downloaded.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// A report written to disk and recorded in the store.
#[derive(Debug, Clone)]
pub struct WrittenReport {
    pub report: Report,
    pub path: PathBuf,
}

/// `lighting_report_<slug>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn report_file_name(project_name: &str, format: ReportFormat, at: DateTime<Utc>) -> String {
    let slug = slugify(project_name);
    let slug = if slug.is_empty() { "project".to_string() } else { slug };
    format!(
        "lighting_report_{}_{}.{}",
        slug,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn render_table(
    table: &ExportTable,
    format: ReportFormat,
) -> std::result::Result<Vec<u8>, ExportError> {
    match format {
        ReportFormat::Pdf => pdf_report::render(table),
        ReportFormat::Csv => csv_report::render(table),
    }
}

/// Renders the session's current state. Reads only in-memory data.
pub fn render_session(
    session: &ResultsSession,
    format: ReportFormat,
    at: DateTime<Utc>,
) -> Result<ReportFile> {
    let table = ExportTable::build(session.project(), session.selection(), at);
    let bytes = render_table(&table, format)?;
    Ok(ReportFile {
        file_name: report_file_name(&session.project().name, format, at),
        content_type: format.content_type(),
        bytes,
    })
}

/// Renders the session into `export_dir` and records a `Report` row.
pub fn write_report<S: ReportRepository + ?Sized>(
    store: &S,
    session: &ResultsSession,
    format: ReportFormat,
    export_dir: &Path,
) -> Result<WrittenReport> {
    let file = render_session(session, format, Utc::now())?;

    std::fs::create_dir_all(export_dir).map_err(|e| ExportError::CreateDirectory {
        path: export_dir.to_path_buf(),
        source: e,
    })?;
    let path = export_dir.join(&file.file_name);
    std::fs::write(&path, &file.bytes).map_err(|e| ExportError::WriteFile {
        path: path.clone(),
        source: e,
    })?;

    let report = store
        .record_report(session.owner(), &session.project().id, format, &file.file_name)
        .map_err(|e| {
            log::error!("Failed to record report {}: {}", file.file_name, e);
            e
        })?;

    log::info!(
        "Exported {} report for project '{}' to {}",
        format.as_str(),
        session.project().name,
        path.display()
    );
    Ok(WrittenReport { report, path })
}
