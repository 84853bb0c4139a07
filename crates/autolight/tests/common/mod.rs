//! Shared test utilities for autolight integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated test execution with a temp directory and
//!   file-backed database
//! - Builder patterns for catalog models and upload requests

pub mod builders;
pub mod harness;

#[allow(unused_imports)]
pub use builders::*;
pub use harness::TestHarness;
