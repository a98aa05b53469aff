//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting the outcome of
//! one export run. The summary is the only thing a run returns; it never
//! carries an error out of the job.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Lifecycle state of an export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    Waiting,
    Copying,
    Archiving,
    Done,
    /// The predecessor wait was interrupted; nothing was copied or archived
    Aborted,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Created => "CREATED",
            JobState::Waiting => "WAITING",
            JobState::Copying => "COPYING",
            JobState::Archiving => "ARCHIVING",
            JobState::Done => "DONE",
            JobState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Phase a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Waiting for the predecessor failed (fatal)
    Dependency,
    /// Copying a single process failed (that process is skipped)
    Copy,
    /// Deleting the previous archive failed (ignored)
    StaleArchive,
    /// Writing the archive failed
    Archive,
    /// The blocking export worker died
    Worker,
    /// A shutdown request stopped the copy phase
    Interrupted,
}

/// A failure recorded during the run
#[derive(Debug, Clone, Serialize)]
pub struct ExportFailure {
    pub kind: FailureKind,

    pub message: String,

    /// Title of the process the failure belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,
}

impl ExportFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            process: None,
        }
    }

    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = Some(process.into());
        self
    }
}

/// Summary of an export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub run_id: Uuid,

    pub project_name: String,

    /// Last state the job reached
    pub state: JobState,

    /// Number of processes handed to the job
    pub total_processes: usize,

    /// Processes whose image folder was copied
    pub copied: usize,

    /// Processes skipped because their finish task is deactivated
    pub excluded: usize,

    /// Processes skipped because their image folder holds no files
    pub empty: usize,

    /// Processes whose copy failed
    pub failed: usize,

    /// Files written into the project tree, nested folders included
    pub files_copied: usize,

    /// Path of the archive, set once it was written completely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<PathBuf>,

    /// Entries written to the archive
    pub archive_entries: usize,

    pub failures: Vec<ExportFailure>,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    pub duration_ms: i64,
}

impl ExportSummary {
    /// Create a new summary in the `Created` state
    pub fn new(run_id: Uuid, project_name: impl Into<String>, total_processes: usize) -> Self {
        Self {
            run_id,
            project_name: project_name.into(),
            state: JobState::Created,
            total_processes,
            copied: 0,
            excluded: 0,
            empty: 0,
            failed: 0,
            files_copied: 0,
            archive_path: None,
            archive_entries: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
        }
    }

    /// Move to the next state
    pub fn transition(&mut self, state: JobState) {
        tracing::debug!(from = %self.state, to = %state, "Export job state change");
        self.state = state;
    }

    /// Add a failure
    pub fn add_failure(&mut self, failure: ExportFailure) {
        self.failures.push(failure);
    }

    /// Stamp the end time and duration
    pub fn finish(mut self) -> Self {
        let now = Utc::now();
        self.duration_ms = (now - self.started_at).num_milliseconds();
        self.finished_at = Some(now);
        self
    }

    /// True if the run reached `Done` without any failure
    pub fn is_successful(&self) -> bool {
        self.state == JobState::Done && self.failures.is_empty()
    }

    /// True if a shutdown request or a cancelled predecessor stopped the run
    pub fn is_aborted(&self) -> bool {
        self.state == JobState::Aborted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            project = %self.project_name,
            state = %self.state,
            total = self.total_processes,
            copied = self.copied,
            excluded = self.excluded,
            empty = self.empty,
            failed = self.failed,
            archive_entries = self.archive_entries,
            duration_ms = self.duration_ms,
            "Export finished"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Export finished with failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    kind = ?failure.kind,
                    process = failure.process.as_deref().unwrap_or("-"),
                    message = %failure.message,
                    "Export failure"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ExportSummary {
        ExportSummary::new(Uuid::new_v4(), "ProjA", 3)
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = summary();

        assert_eq!(summary.state, JobState::Created);
        assert_eq!(summary.total_processes, 3);
        assert_eq!(summary.copied, 0);
        assert!(summary.failures.is_empty());
        assert!(summary.archive_path.is_none());
        assert!(summary.finished_at.is_none());
    }

    #[test]
    fn test_is_successful_requires_done_without_failures() {
        let mut summary = summary();
        assert!(!summary.is_successful());

        summary.transition(JobState::Done);
        assert!(summary.is_successful());

        summary.add_failure(ExportFailure::new(FailureKind::Copy, "disk full").with_process("p1"));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_aborted_state() {
        let mut summary = summary();
        summary.transition(JobState::Waiting);
        summary.transition(JobState::Aborted);
        assert!(summary.is_aborted());
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_finish_sets_end_time() {
        let summary = summary().finish();
        assert!(summary.finished_at.is_some());
        assert!(summary.duration_ms >= 0);
    }

    #[test]
    fn test_failure_with_process() {
        let failure = ExportFailure::new(FailureKind::Copy, "boom").with_process("proc1");
        assert_eq!(failure.kind, FailureKind::Copy);
        assert_eq!(failure.process.as_deref(), Some("proc1"));
    }

    #[test]
    fn test_summary_serializes_state_snake_case() {
        let mut summary = summary();
        summary.transition(JobState::Done);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["state"], "done");
        assert_eq!(json["project_name"], "ProjA");
        assert!(json.get("archive_path").is_none());
    }

    #[test]
    fn test_job_state_display() {
        assert_eq!(JobState::Waiting.to_string(), "WAITING");
        assert_eq!(JobState::Done.to_string(), "DONE");
    }
}
