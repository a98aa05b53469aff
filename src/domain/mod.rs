//! Domain models and types.
//!
//! The domain layer provides:
//! - **Workflow views** ([`ProcessRef`], [`TaskRecord`], [`TaskStatus`])
//! - **Error types** ([`ExportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExportError>`]:
//!
//! ```rust
//! use project_export::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = project_export::config::load_config("project-export.toml")?;
//!     println!("{}", config.export.project_name);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod process;
pub mod result;

pub use errors::ExportError;
pub use process::{ProcessRef, TaskRecord, TaskStatus};
pub use result::Result;
