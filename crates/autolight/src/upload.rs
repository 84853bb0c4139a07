//! Upload workflow: validate the file metadata, create the project, run
//! detection, then store fixtures, recommendations and aggregates.
//!
//! A project moves pending → processing → completed. Any failure after the
//! row exists marks it failed with the error message, so the attempt stays
//! visible in the project list.

use std::path::Path;

use crate::catalog::CatalogCache;
use crate::detector::{DetectionInput, FixtureDetector};
use crate::error::{AutolightError, Result, ValidationError};
use crate::model::{Fixture, NewProject, OwnerId, Project, ProjectStatus, SourceFileType};
use crate::progress::{ProgressEvent, ProgressReporter, UploadPhase};
use crate::repository::RecordStore;
use crate::selection::{derive_recommendations, recommendation_inputs};

/// Upload size limit used when settings do not override it (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub project_name: String,
    pub file_name: String,
    pub size: u64,
}

/// An upload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedUpload {
    pub project_name: String,
    pub file_name: String,
    pub file_type: SourceFileType,
    pub size: u64,
}

impl UploadRequest {
    pub fn validate(
        &self,
        max_bytes: u64,
    ) -> std::result::Result<ValidatedUpload, ValidationError> {
        let project_name = self.project_name.trim();
        if project_name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }

        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let file_type = SourceFileType::from_extension(ext)
            .ok_or_else(|| ValidationError::UnsupportedExtension(ext.to_string()))?;

        if self.size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if self.size > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size: self.size,
                limit: max_bytes,
            });
        }

        Ok(ValidatedUpload {
            project_name: project_name.to_string(),
            file_name: self.file_name.clone(),
            file_type,
            size: self.size,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub project: Project,
    pub fixtures: Vec<Fixture>,
}

/// Runs the whole upload and returns the completed project.
pub fn process<S, D>(
    store: &S,
    owner: &OwnerId,
    request: &UploadRequest,
    detector: &mut D,
    max_bytes: u64,
    progress: &dyn ProgressReporter,
) -> Result<UploadOutcome>
where
    S: RecordStore + ?Sized,
    D: FixtureDetector + ?Sized,
{
    let _span = tracing::info_span!("upload.process", file = %request.file_name).entered();

    progress.report(ProgressEvent::Phase {
        phase: UploadPhase::Validating,
        message: format!("Validating {}", request.file_name),
    });
    let upload = match request.validate(max_bytes) {
        Ok(upload) => upload,
        Err(e) => {
            progress.report(ProgressEvent::Failed { error: e.to_string() });
            return Err(e.into());
        }
    };

    let project = match store.create_project(
        owner,
        &NewProject {
            name: upload.project_name.clone(),
            source_file_name: upload.file_name.clone(),
            source_file_type: upload.file_type,
        },
    ) {
        Ok(project) => project,
        Err(e) => {
            log::error!("Failed to create project '{}': {}", upload.project_name, e);
            progress.report(ProgressEvent::Failed { error: e.to_string() });
            return Err(e.into());
        }
    };

    match populate(store, owner, &project, &upload, detector, progress) {
        Ok(outcome) => {
            log::info!(
                "Processed upload {} into project {} ({} fixtures)",
                upload.file_name,
                outcome.project.id,
                outcome.project.total_fixtures
            );
            progress.report(ProgressEvent::Completed {
                project_id: outcome.project.id.clone(),
                total_fixtures: outcome.project.total_fixtures,
            });
            Ok(outcome)
        }
        Err(e) => {
            log::error!("Upload of {} failed: {}", upload.file_name, e);
            let message = e.to_string();
            if let Err(mark) =
                store.set_project_status(owner, &project.id, ProjectStatus::Failed, Some(&message))
            {
                log::warn!("Failed to mark project {} as failed: {}", project.id, mark);
            }
            progress.report(ProgressEvent::Failed { error: message });
            Err(e)
        }
    }
}

fn populate<S, D>(
    store: &S,
    owner: &OwnerId,
    project: &Project,
    upload: &ValidatedUpload,
    detector: &mut D,
    progress: &dyn ProgressReporter,
) -> std::result::Result<UploadOutcome, AutolightError>
where
    S: RecordStore + ?Sized,
    D: FixtureDetector + ?Sized,
{
    store.set_project_status(owner, &project.id, ProjectStatus::Processing, None)?;
    progress.report(ProgressEvent::Phase {
        phase: UploadPhase::Detecting,
        message: "Detecting lighting fixtures".to_string(),
    });
    let catalog = CatalogCache::load(store)?;
    let detected = detector.detect(
        &DetectionInput {
            file_name: &upload.file_name,
            file_type: upload.file_type,
            size: upload.size,
        },
        &catalog,
    );

    progress.report(ProgressEvent::Phase {
        phase: UploadPhase::Storing,
        message: format!("Storing {} fixtures", detected.len()),
    });
    let fixtures = store.insert_fixtures(owner, &project.id, &detected)?;
    for fixture in &fixtures {
        let selected = fixture.selected_model_id.as_deref().and_then(|id| catalog.get(id));
        let recommendations = derive_recommendations(selected, &catalog);
        if !recommendations.is_empty() {
            let inputs = recommendation_inputs(&recommendations);
            store.replace_recommendations(owner, &fixture.id, &inputs)?;
        }
    }
    store.refresh_aggregates(owner, &project.id)?;
    let project = store.set_project_status(owner, &project.id, ProjectStatus::Completed, None)?;

    Ok(UploadOutcome { project, fixtures })
}
