//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// [`load_config`] already validates, so a successful load means a valid file.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Export Folder: {}", config.export.export_folder);
        println!("  Project: {}", config.export.project_name);
        println!("  Image Folder: {}", config.export.image_folder);
        println!("  Finish Step: {}", config.export.finish_step_name);
        println!("  Processes: {}", config.processes.len());

        let excluded = config
            .processes
            .iter()
            .filter(|p| p.is_excluded(&config.export.finish_step_name))
            .count();
        if excluded > 0 {
            println!("  Excluded (finish step deactivated): {excluded}");
        }

        let unresolved: Vec<&str> = config
            .processes
            .iter()
            .filter(|p| p.image_directory(&config.export.image_folder).is_err())
            .map(|p| p.title.as_str())
            .collect();
        if !unresolved.is_empty() {
            println!(
                "  Warning: no '{}' image folder for: {}",
                config.export.image_folder,
                unresolved.join(", ")
            );
        }
        println!();

        Ok(EXIT_SUCCESS)
    }
}
