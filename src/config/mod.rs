//! Configuration management.
//!
//! TOML-based configuration loading, parsing and validation.
//!
//! # Overview
//!
//! The configuration file supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PROJECT_EXPORT_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! export_folder = "${EXPORT_ROOT}"
//! project_name = "ProjA"
//! image_folder = "media"
//! finish_step_name = "Export"
//!
//! [logging]
//! local_enabled = false
//!
//! [[processes]]
//! title = "proc1"
//! image_folders = { media = "/data/proc1/images/proc1_media" }
//! tasks = [{ title = "Export", status = "open" }]
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use project_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("project-export.toml")?;
//! println!("Exporting {} to {}", config.export.project_name, config.export.export_folder);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, ExportConfig, LoggingConfig, ProjectExportConfig};
