//! CLI command implementations

pub mod export;
pub mod validate;

/// Exit code: the export ran without failures
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code: the export finished but some processes or the archive failed
pub const EXIT_PARTIAL: i32 = 1;
/// Exit code: the configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: unrecoverable error
pub const EXIT_FATAL: i32 = 5;
/// Exit code: interrupted by a signal (SIGINT convention)
pub const EXIT_INTERRUPTED: i32 = 130;
