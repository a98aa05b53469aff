//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.

use crate::core::export::ExportJobConfig;
use crate::domain::process::validate_path_component;
use crate::domain::ProcessRef;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export destination and selection settings
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Processes of the project, in export order
    #[serde(default)]
    pub processes: Vec<ProcessRef>,
}

impl ProjectExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        for process in &self.processes {
            process.validate()?;
        }
        Ok(())
    }

    /// Builds the job configuration for this project
    pub fn job_config(&self) -> ExportJobConfig {
        ExportJobConfig {
            export_folder: self.export.export_folder.clone().into(),
            project_name: self.export.project_name.clone(),
            image_folder: self.export.image_folder.clone(),
            finish_step_name: self.export.finish_step_name.clone(),
            processes: self.processes.clone(),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root folder receiving `<project_name>/` and `<project_name>.zip`
    pub export_folder: String,

    /// Project name, used as the destination subfolder and archive name
    pub project_name: String,

    /// Image folder variant copied for every process
    #[serde(default = "default_image_folder")]
    pub image_folder: String,

    /// Title of the task whose deactivation excludes a process
    #[serde(default = "default_finish_step_name")]
    pub finish_step_name: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.export_folder.trim().is_empty() {
            return Err("export.export_folder cannot be empty".to_string());
        }
        validate_path_component("export.project_name", &self.project_name)?;
        if self.image_folder.trim().is_empty() {
            return Err("export.image_folder cannot be empty".to_string());
        }
        if self.finish_step_name.trim().is_empty() {
            return Err("export.finish_step_name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_image_folder() -> String {
    "media".to_string()
}

fn default_finish_step_name() -> String {
    "Export".to_string()
}

fn default_local_path() -> String {
    "/var/log/project-export".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
