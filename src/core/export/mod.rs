//! Project export
//!
//! This module provides the export job and its pieces:
//! - The job itself: predecessor wait, per-process copy, archive rebuild
//! - Zip archive construction
//! - Summary and reporting

pub mod archive;
pub mod job;
pub mod summary;

pub use archive::build_archive;
pub use job::{ExportJob, ExportJobConfig, Predecessor, FATAL_NOTIFICATION};
pub use summary::{ExportFailure, ExportSummary, FailureKind, JobState};
