//! Result type alias for project export operations

use super::errors::ExportError;

/// Result type alias using [`ExportError`] as the error type
///
/// # Examples
///
/// ```
/// use project_export::domain::result::Result;
/// use project_export::domain::errors::ExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExportError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExportError>;
