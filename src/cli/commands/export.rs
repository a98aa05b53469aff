//! Export command implementation
//!
//! Runs one project export from the configuration file. With `--after`, a
//! second configuration is exported first and the main export waits for it.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_INTERRUPTED, EXIT_PARTIAL, EXIT_SUCCESS};
use crate::adapters::{CollectingNotifier, LocalStorage, NotificationLevel, StorageProvider};
use crate::config::load_config;
use crate::core::export::{ExportJob, ExportSummary};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Override the project name
    #[arg(long)]
    pub project: Option<String>,

    /// Override the export folder
    #[arg(long)]
    pub export_folder: Option<String>,

    /// Export this configuration first and wait for it to finish
    #[arg(long, value_name = "CONFIG")]
    pub after: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(project) = &self.project {
            tracing::info!(project = %project, "Overriding project name from CLI");
            config.export.project_name = project.clone();
        }
        if let Some(folder) = &self.export_folder {
            tracing::info!(export_folder = %folder, "Overriding export folder from CLI");
            config.export.export_folder = folder.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new());
        let notifier = Arc::new(CollectingNotifier::new());

        let mut job = ExportJob::new(config.job_config(), storage.clone())
            .with_notifier(notifier.clone())
            .with_shutdown_signal(shutdown_signal.clone());

        if let Some(after) = &self.after {
            let predecessor_config = match load_config(after) {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(config_path = %after, error = %e, "Failed to load predecessor configuration");
                    eprintln!("{e}");
                    return Ok(EXIT_CONFIG);
                }
            };
            tracing::info!(
                project = %predecessor_config.export.project_name,
                "Exporting predecessor project first"
            );
            let predecessor = ExportJob::new(predecessor_config.job_config(), storage)
                .with_notifier(notifier.clone())
                .with_shutdown_signal(shutdown_signal)
                .spawn();
            job = job.with_predecessor(predecessor);
        }

        let summary = job.run().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        for notification in notifier.notifications() {
            match notification.level {
                NotificationLevel::Info => println!("{}", notification.message),
                NotificationLevel::Error => eprintln!("{}", notification.message),
            }
        }

        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary ({}):", summary.project_name);
    println!("  State: {}", summary.state);
    println!("  Processes: {}", summary.total_processes);
    println!("  Copied: {}", summary.copied);
    println!("  Excluded: {}", summary.excluded);
    println!("  Empty: {}", summary.empty);
    println!("  Failed: {}", summary.failed);
    match &summary.archive_path {
        Some(path) => println!(
            "  Archive: {} ({} entries)",
            path.display(),
            summary.archive_entries
        ),
        None => println!("  Archive: not written"),
    }
    println!("  Duration: {:.2}s", summary.duration_ms as f64 / 1000.0);

    if !summary.failures.is_empty() {
        println!();
        println!("Failures:");
        for failure in &summary.failures {
            match &failure.process {
                Some(process) => println!("  - {:?} [{}]: {}", failure.kind, process, failure.message),
                None => println!("  - {:?}: {}", failure.kind, failure.message),
            }
        }
    }
    println!();
}

/// Maps a finished run to the process exit code
pub fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.is_aborted() {
        EXIT_INTERRUPTED
    } else if summary.is_successful() {
        EXIT_SUCCESS
    } else if summary.archive_path.is_none() {
        EXIT_FATAL
    } else {
        EXIT_PARTIAL
    }
}
