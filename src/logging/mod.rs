//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output
//! - Optional JSON log files with rotation
//! - `RUST_LOG` filter override
//!
//! # Example
//!
//! ```no_run
//! use project_export::logging::init_logging;
//! use project_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(project = "ProjA", "Export started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
