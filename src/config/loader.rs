//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ProjectExportConfig;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variables that override file values
pub const ENV_PREFIX: &str = "PROJECT_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into [`ProjectExportConfig`]
/// 4. Applies environment variable overrides (PROJECT_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ExportError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails or the
/// result does not validate.
///
/// # Examples
///
/// ```no_run
/// use project_export::config::loader::load_config;
///
/// let config = load_config("project-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ProjectExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ProjectExportConfig = toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Placeholders inside comments are documentation, not references.
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{key}")).ok()
}

/// Applies environment variable overrides using the PROJECT_EXPORT_* prefix
///
/// Variables follow the pattern PROJECT_EXPORT_<SECTION>_<KEY>, for example
/// PROJECT_EXPORT_EXPORT_PROJECT_NAME or PROJECT_EXPORT_LOGGING_LOCAL_PATH.
fn apply_env_overrides(config: &mut ProjectExportConfig) {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env_override("EXPORT_EXPORT_FOLDER") {
        config.export.export_folder = val;
    }
    if let Some(val) = env_override("EXPORT_PROJECT_NAME") {
        config.export.project_name = val;
    }
    if let Some(val) = env_override("EXPORT_IMAGE_FOLDER") {
        config.export.image_folder = val;
    }
    if let Some(val) = env_override("EXPORT_FINISH_STEP_NAME") {
        config.export.finish_step_name = val;
    }

    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
