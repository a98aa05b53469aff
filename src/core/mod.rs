//! Core business logic.
//!
//! # Modules
//!
//! - [`export`] - The export job, archive construction and run summary
//!
//! # Export Workflow
//!
//! 1. **Wait**: Await the predecessor task, if one was attached
//! 2. **Copy**: For each process, skip it if its finish task is deactivated
//!    or its image folder is empty, otherwise copy the folder into
//!    `<export_folder>/<project_name>/<process title>`
//! 3. **Archive**: Delete the old `<project_name>.zip` and zip the project tree
//! 4. **Report**: Return and log an [`export::ExportSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use project_export::adapters::LocalStorage;
//! use project_export::config::load_config;
//! use project_export::core::export::ExportJob;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("project-export.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let summary = ExportJob::new(config.job_config(), Arc::new(LocalStorage::new()))
//!     .with_shutdown_signal(shutdown_rx)
//!     .run()
//!     .await;
//!
//! println!("Copied: {}", summary.copied);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod export;
