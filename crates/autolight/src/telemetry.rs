//! Global tracing subscriber setup.
//!
//! `RUST_LOG` wins over the filter from settings. Records emitted through
//! the `log` macros are forwarded into the subscriber by `LogTracer`.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

pub fn build_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|e| TelemetryError::InvalidFilter {
        filter: fallback.to_string(),
        source: e,
    })
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = build_filter(filter)?;

    let installed = match format {
        LogFormat::Text => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(true)),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::registry().with(filter).with(fmt::layer().json()),
        ),
    };
    installed.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing_log::LogTracer::init().map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    log::debug!("Telemetry initialized ({:?} format)", format);
    Ok(())
}
