use std::fmt;

/// Stages an upload passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Validating,
    Detecting,
    Storing,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Detecting => "detecting",
            Self::Storing => "storing",
        };
        f.write_str(name)
    }
}

/// Events emitted while an upload is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Phase {
        phase: UploadPhase,
        message: String,
    },
    Completed {
        project_id: String,
        total_fixtures: i64,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Forwards events to the log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => log::info!("[{}] {}", phase, message),
            ProgressEvent::Completed {
                project_id,
                total_fixtures,
            } => log::info!(
                "Upload completed: project {} with {} fixtures",
                project_id,
                total_fixtures
            ),
            ProgressEvent::Failed { error } => log::warn!("Upload failed: {}", error),
        }
    }
}
