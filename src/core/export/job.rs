//! Export job - waits for its predecessor, copies, archives
//!
//! One [`ExportJob`] handles one project. It is configured, run once and
//! dropped. The run is a strict sequence:
//!
//! 1. await the predecessor task, if any (the only suspension point)
//! 2. copy the selected image folder of every eligible process into
//!    `<export_folder>/<project_name>/<process title>`
//! 3. rebuild `<export_folder>/<project_name>.zip` from that tree
//!
//! A failing process is logged and skipped; nothing that goes wrong inside
//! the job is returned as an error.

use super::archive::build_archive;
use super::summary::{ExportFailure, ExportSummary, FailureKind, JobState};
use crate::adapters::{LogNotifier, Notifier, StorageProvider};
use crate::domain::{ExportError, ProcessRef, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::Instrument;
use uuid::Uuid;

/// Message shown to the user when the job cannot start
pub const FATAL_NOTIFICATION: &str = "Error exporting project. See application log for details";

/// A unit of work the job must wait for
pub type Predecessor = Pin<Box<dyn Future<Output = std::result::Result<(), JoinError>> + Send>>;

/// What to export and where
#[derive(Debug, Clone)]
pub struct ExportJobConfig {
    /// Root folder receiving `<project_name>/` and `<project_name>.zip`
    pub export_folder: PathBuf,

    /// Project name, used as the destination subfolder and archive name
    pub project_name: String,

    /// Image folder variant copied for every process
    pub image_folder: String,

    /// Title of the task whose deactivation excludes a process
    pub finish_step_name: String,

    /// Processes in export order
    pub processes: Vec<ProcessRef>,
}

impl ExportJobConfig {
    /// `<export_folder>/<project_name>`
    pub fn project_dir(&self) -> PathBuf {
        self.export_folder.join(&self.project_name)
    }

    /// `<export_folder>/<project_name>/<process title>`
    pub fn process_dir(&self, process: &ProcessRef) -> PathBuf {
        self.project_dir().join(&process.title)
    }

    /// `<export_folder>/<project_name>.zip`
    pub fn archive_path(&self) -> PathBuf {
        self.export_folder.join(format!("{}.zip", self.project_name))
    }
}

/// Exports one project
///
/// # Example
///
/// ```rust,no_run
/// use project_export::adapters::LocalStorage;
/// use project_export::core::export::{ExportJob, ExportJobConfig};
/// use project_export::domain::ProcessRef;
/// use std::sync::Arc;
///
/// # async fn example() {
/// let config = ExportJobConfig {
///     export_folder: "/out".into(),
///     project_name: "ProjA".to_string(),
///     image_folder: "media".to_string(),
///     finish_step_name: "Export".to_string(),
///     processes: vec![ProcessRef::new("proc1").with_image_folder("media", "/data/proc1/media")],
/// };
///
/// let metadata = tokio::spawn(async { /* metadata export */ });
/// let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
///     .with_predecessor(metadata)
///     .run()
///     .await;
/// println!("copied {} processes", summary.copied);
/// # }
/// ```
pub struct ExportJob {
    run_id: Uuid,
    config: ExportJobConfig,
    storage: Arc<dyn StorageProvider>,
    notifier: Arc<dyn Notifier>,
    predecessor: Option<Predecessor>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ExportJob {
    /// Create a job that logs its notifications
    pub fn new(config: ExportJobConfig, storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            config,
            storage,
            notifier: Arc::new(LogNotifier),
            predecessor: None,
            shutdown: None,
        }
    }

    /// Send user-facing messages to `notifier` instead of the log
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Wait for `handle` to finish before copying anything
    pub fn with_predecessor<T: Send + 'static>(mut self, handle: JoinHandle<T>) -> Self {
        self.predecessor = Some(Box::pin(async move { handle.await.map(|_| ()) }));
        self
    }

    /// Stop the job once `shutdown` turns true
    ///
    /// The signal interrupts the predecessor wait and is checked again before
    /// every process and before the archive is built.
    pub fn with_shutdown_signal(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run the job on the tokio runtime
    pub fn spawn(self) -> JoinHandle<ExportSummary> {
        tokio::spawn(self.run())
    }

    /// Run the job to completion
    pub async fn run(self) -> ExportSummary {
        let span = tracing::info_span!(
            "export_job",
            run_id = %self.run_id,
            project = %self.config.project_name
        );
        self.execute().instrument(span).await
    }

    async fn execute(mut self) -> ExportSummary {
        let mut summary = ExportSummary::new(
            self.run_id,
            self.config.project_name.clone(),
            self.config.processes.len(),
        );

        if let Some(predecessor) = self.predecessor.take() {
            summary.transition(JobState::Waiting);
            if let Err(e) = wait_for(predecessor, self.shutdown.clone()).await {
                tracing::error!(error = %e, "Export aborted before copying");
                self.notifier.error(FATAL_NOTIFICATION);
                summary.add_failure(ExportFailure::new(FailureKind::Dependency, e.to_string()));
                summary.transition(JobState::Aborted);
                let summary = summary.finish();
                summary.log_summary();
                return summary;
            }
        }

        let ExportJob {
            config,
            storage,
            notifier,
            shutdown,
            ..
        } = self;

        // Copying and zipping are plain blocking I/O.
        let span = tracing::Span::current();
        let fallback = summary.clone();
        let worker = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut summary = summary;
            ExportWorker {
                config: &config,
                storage: storage.as_ref(),
                shutdown: shutdown.as_ref(),
            }
            .execute(&mut summary);
            summary
        });

        let summary = match worker.await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Export worker failed");
                let mut summary = fallback;
                summary.add_failure(ExportFailure::new(FailureKind::Worker, e.to_string()));
                summary.transition(JobState::Done);
                summary
            }
        };

        if summary.is_aborted() {
            notifier.error(FATAL_NOTIFICATION);
        } else if summary.failures.is_empty() {
            notifier.info(&format!(
                "Project {} exported ({} processes copied)",
                summary.project_name, summary.copied
            ));
        } else {
            notifier.error(&format!(
                "Export of project {} finished with {} failure(s). See application log for details",
                summary.project_name,
                summary.failures.len()
            ));
        }

        let summary = summary.finish();
        summary.log_summary();
        summary
    }
}

/// Awaits the predecessor, racing it against the shutdown signal
///
/// A predecessor that panicked has finished all the same; only a cancelled
/// predecessor or a shutdown request interrupts the wait. The predecessor is
/// polled first, so one that already finished wins over a pending signal.
async fn wait_for(
    predecessor: Predecessor,
    shutdown: Option<watch::Receiver<bool>>,
) -> Result<()> {
    tracing::info!("Waiting for predecessor to finish");

    let outcome = match shutdown {
        Some(mut shutdown) => {
            tokio::select! {
                biased;
                outcome = predecessor => outcome,
                _ = shutdown_requested(&mut shutdown) => {
                    return Err(ExportError::Interrupted("shutdown requested".to_string()));
                }
            }
        }
        None => predecessor.await,
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(e) if e.is_panic() => {
            tracing::warn!(error = %e, "Predecessor panicked, continuing with export");
            Ok(())
        }
        Err(e) => Err(ExportError::Interrupted(format!(
            "predecessor was cancelled: {e}"
        ))),
    }
}

/// Resolves once the signal is true; never resolves if the sender is gone
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let sender_gone = shutdown.wait_for(|stop| *stop).await.is_err();
    if sender_gone {
        std::future::pending::<()>().await;
    }
}

enum CopyOutcome {
    Copied { files: usize },
    Empty,
}

/// Blocking half of the job: copy phase then archive phase
struct ExportWorker<'a> {
    config: &'a ExportJobConfig,
    storage: &'a dyn StorageProvider,
    shutdown: Option<&'a watch::Receiver<bool>>,
}

impl ExportWorker<'_> {
    fn execute(&self, summary: &mut ExportSummary) {
        summary.transition(JobState::Copying);
        tracing::info!(
            destination = %self.config.project_dir().display(),
            processes = self.config.processes.len(),
            "Copying project content to export destination"
        );
        for process in &self.config.processes {
            if self.stop_requested(summary) {
                return;
            }
            self.export_process(process, summary);
        }

        if self.stop_requested(summary) {
            return;
        }
        summary.transition(JobState::Archiving);
        self.archive(summary);

        summary.transition(JobState::Done);
    }

    /// Marks the run aborted if shutdown was requested
    ///
    /// Files already copied stay in place; the archive is not touched.
    fn stop_requested(&self, summary: &mut ExportSummary) -> bool {
        let requested = self.shutdown.is_some_and(|shutdown| *shutdown.borrow());
        if requested {
            tracing::warn!(state = %summary.state, "Shutdown requested, stopping export");
            summary.add_failure(ExportFailure::new(
                FailureKind::Interrupted,
                format!("shutdown requested while {}", summary.state),
            ));
            summary.transition(JobState::Aborted);
        }
        requested
    }

    fn export_process(&self, process: &ProcessRef, summary: &mut ExportSummary) {
        if process.is_excluded(&self.config.finish_step_name) {
            tracing::debug!(
                process = %process.title,
                finish_step = %self.config.finish_step_name,
                "Finish step deactivated, skipping process"
            );
            summary.excluded += 1;
            return;
        }

        match self.copy_process(process) {
            Ok(CopyOutcome::Copied { files }) => {
                summary.copied += 1;
                summary.files_copied += files;
            }
            Ok(CopyOutcome::Empty) => {
                tracing::debug!(process = %process.title, "No files to export");
                summary.empty += 1;
            }
            Err(e) => {
                tracing::error!(process = %process.title, error = %e, "Failed to export process");
                summary.failed += 1;
                summary.add_failure(
                    ExportFailure::new(FailureKind::Copy, e.to_string()).with_process(&process.title),
                );
            }
        }
    }

    fn copy_process(&self, process: &ProcessRef) -> Result<CopyOutcome> {
        let source = process.image_directory(&self.config.image_folder)?;
        let files = self.storage.list(source)?;
        tracing::debug!(
            process = %process.title,
            source = %source.display(),
            count = files.len(),
            "Exporting files for process"
        );
        if files.is_empty() {
            return Ok(CopyOutcome::Empty);
        }

        let target = self.config.process_dir(process);
        if !self.storage.exists(&target) {
            self.storage.create_dir_all(&target)?;
        }
        let files = self.storage.copy_directory(source, &target)?;

        Ok(CopyOutcome::Copied { files })
    }

    fn archive(&self, summary: &mut ExportSummary) {
        let archive_path = self.config.archive_path();
        tracing::info!(archive = %archive_path.display(), "Creating zip file for project");

        self.remove_stale_archive(&archive_path, summary);

        match build_archive(self.storage, &self.config.project_dir(), &archive_path) {
            Ok(entries) => {
                tracing::info!(
                    archive = %archive_path.display(),
                    entries,
                    "Archive written"
                );
                summary.archive_entries = entries;
                summary.archive_path = Some(archive_path);
            }
            Err(e) => {
                tracing::error!(archive = %archive_path.display(), error = %e, "Failed to write archive");
                summary.add_failure(ExportFailure::new(FailureKind::Archive, e.to_string()));
            }
        }
    }

    /// Best effort: a failed delete is logged and the build still runs
    fn remove_stale_archive(&self, archive_path: &Path, summary: &mut ExportSummary) {
        if !self.storage.exists(archive_path) {
            return;
        }
        if let Err(e) = self.storage.delete_file(archive_path) {
            tracing::error!(
                archive = %archive_path.display(),
                error = %e,
                "Failed to delete previous archive"
            );
            summary.add_failure(ExportFailure::new(FailureKind::StaleArchive, e.to_string()));
        }
    }
}
