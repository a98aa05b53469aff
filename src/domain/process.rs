//! Workflow process and task records
//!
//! These are the views of the workflow engine's processes that the export
//! job consumes. The host populates them; the job only reads titles, task
//! statuses and image folder locations.

use super::errors::ExportError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Processing status of a workflow task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Locked,
    Open,
    InWork,
    Done,
    Error,
    Deactivated,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatus::Locked => "locked",
            TaskStatus::Open => "open",
            TaskStatus::InWork => "inwork",
            TaskStatus::Done => "done",
            TaskStatus::Error => "error",
            TaskStatus::Deactivated => "deactivated",
        };
        f.write_str(name)
    }
}

/// A single task of a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub status: TaskStatus,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
        }
    }
}

/// A workflow process as seen by the export job
///
/// # Examples
///
/// ```
/// use project_export::domain::{ProcessRef, TaskRecord, TaskStatus};
///
/// let process = ProcessRef::new("proc1")
///     .with_image_folder("media", "/data/proc1/images/proc1_media")
///     .with_task(TaskRecord::new("Export", TaskStatus::Deactivated));
///
/// assert!(process.is_excluded("Export"));
/// assert!(!process.is_excluded("Scanning"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRef {
    /// Process title, used as the destination subfolder name
    pub title: String,

    /// Tasks in workflow order
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,

    /// Image folder variants (e.g. "media", "master") mapped to directories
    #[serde(default)]
    pub image_folders: BTreeMap<String, PathBuf>,
}

impl ProcessRef {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
            image_folders: BTreeMap::new(),
        }
    }

    pub fn with_task(mut self, task: TaskRecord) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_image_folder(mut self, variant: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.image_folders.insert(variant.into(), dir.into());
        self
    }

    /// True if the finish task of this process was deactivated
    ///
    /// Only a task whose title equals `finish_task_title` and whose status
    /// is [`TaskStatus::Deactivated`] excludes the process.
    pub fn is_excluded(&self, finish_task_title: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.title == finish_task_title && t.status == TaskStatus::Deactivated)
    }

    /// Resolves the directory of the selected image folder variant
    pub fn image_directory(&self, variant: &str) -> Result<&Path> {
        self.image_folders
            .get(variant)
            .map(PathBuf::as_path)
            .ok_or_else(|| ExportError::ImageFolderNotConfigured {
                process: self.title.clone(),
                variant: variant.to_string(),
            })
    }

    /// Checks that the title can be used as a single directory name
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_path_component("process title", &self.title)
    }
}

/// Rejects empty names and names that would escape or nest below their parent
pub(crate) fn validate_path_component(what: &str, name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(format!(
            "{what} '{name}' must be a single directory name"
        )),
    }
}
