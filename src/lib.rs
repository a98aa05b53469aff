//! # project-export
//!
//! Exports the image folders of every process in a project into a single
//! directory tree and packs that tree into one ZIP archive.
//!
//! ## Overview
//!
//! An export run:
//! - optionally waits for a predecessor task to finish
//! - copies each process's selected image folder to
//!   `<export_folder>/<project>/<process title>`
//! - skips processes whose finish step is deactivated or whose image folder is empty
//! - rebuilds `<export_folder>/<project>.zip` from the copied tree
//!
//! A failing process is recorded and the run moves on; no error leaves the job.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The export job, archive writer and run summary
//! - [`adapters`] - Storage and notification seams
//! - [`domain`] - Process and task types, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use project_export::adapters::LocalStorage;
//! use project_export::config::load_config;
//! use project_export::core::export::ExportJob;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("project-export.toml")?;
//!
//!     let summary = ExportJob::new(config.job_config(), Arc::new(LocalStorage::new()))
//!         .run()
//!         .await;
//!
//!     println!("Copied {} processes", summary.copied);
//!     Ok(())
//! }
//! ```
//!
//! ## Chaining jobs
//!
//! A job can wait for any spawned task, including another export:
//!
//! ```rust,no_run
//! # use project_export::adapters::{LocalStorage, StorageProvider};
//! # use project_export::core::export::{ExportJob, ExportJobConfig};
//! # use std::sync::Arc;
//! # async fn example(first: ExportJobConfig, second: ExportJobConfig) {
//! let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new());
//! let predecessor = ExportJob::new(first, storage.clone()).spawn();
//!
//! let summary = ExportJob::new(second, storage)
//!     .with_predecessor(predecessor)
//!     .run()
//!     .await;
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
