//! Integration tests for the project export job
//!
//! Every test builds a throwaway image tree under a temp dir, runs a job
//! against it and inspects both the copied tree and the archive.

use project_export::adapters::{CollectingNotifier, LocalStorage, StorageProvider};
use project_export::cli::commands::export::exit_code;
use project_export::cli::commands::{EXIT_FATAL, EXIT_INTERRUPTED};
use project_export::core::export::{
    ExportJob, ExportJobConfig, FailureKind, JobState, FATAL_NOTIFICATION,
};
use project_export::domain::{ExportError, ProcessRef, Result, TaskRecord, TaskStatus};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;
use tokio::sync::watch;

/// Writes `files` into `<root>/images/<title>` and returns a process pointing at it
fn process_with_files(root: &Path, title: &str, files: &[&str]) -> ProcessRef {
    let dir = root.join("images").join(title);
    fs::create_dir_all(&dir).unwrap();
    for name in files {
        fs::write(dir.join(name), format!("content of {title}/{name}")).unwrap();
    }
    ProcessRef::new(title).with_image_folder("media", dir)
}

fn job_config(root: &Path, processes: Vec<ProcessRef>) -> ExportJobConfig {
    let export_folder = root.join("out");
    fs::create_dir_all(&export_folder).unwrap();
    ExportJobConfig {
        export_folder,
        project_name: "ProjA".to_string(),
        image_folder: "media".to_string(),
        finish_step_name: "Export".to_string(),
        processes,
    }
}

fn archive_entries(path: &Path) -> BTreeSet<String> {
    let file = File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn archive_entry_content(path: &Path, name: &str) -> String {
    let file = File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    content
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Local storage that fails selected operations
#[derive(Default)]
struct FailingStorage {
    inner: LocalStorage,
    fail_list_of: Option<PathBuf>,
    fail_copy_from: Option<PathBuf>,
    fail_delete: bool,
}

impl FailingStorage {
    fn failing_list(dir: impl Into<PathBuf>) -> Self {
        Self {
            fail_list_of: Some(dir.into()),
            ..Self::default()
        }
    }

    fn failing_copy(source: impl Into<PathBuf>) -> Self {
        Self {
            fail_copy_from: Some(source.into()),
            ..Self::default()
        }
    }

    fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Self::default()
        }
    }
}

impl StorageProvider for FailingStorage {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        if self.fail_list_of.as_deref() == Some(dir) {
            return Err(ExportError::storage(dir, "stale file handle"));
        }
        self.inner.list(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        if self.fail_delete {
            return Err(ExportError::storage(path, "permission denied"));
        }
        self.inner.delete_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.inner.create_dir_all(path)
    }

    fn copy_directory(&self, source: &Path, target: &Path) -> Result<usize> {
        if self.fail_copy_from.as_deref() == Some(source) {
            return Err(ExportError::storage(source, "device not ready"));
        }
        self.inner.copy_directory(source, target)
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.inner.open_read(path)
    }
}

#[tokio::test]
async fn test_exports_project_tree_and_archive() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif", "b.tif"]);
    let proc2 = process_with_files(temp_dir.path(), "proc2", &[]);
    let config = job_config(temp_dir.path(), vec![proc1, proc2]);
    let out = config.export_folder.clone();

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert_eq!(summary.state, JobState::Done);
    assert!(summary.is_successful());
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.files_copied, 2);

    assert!(out.join("ProjA/proc1/a.tif").is_file());
    assert!(out.join("ProjA/proc1/b.tif").is_file());
    assert!(!out.join("ProjA/proc2").exists());

    let archive = out.join("ProjA.zip");
    assert_eq!(summary.archive_path.as_deref(), Some(archive.as_path()));
    assert_eq!(summary.archive_entries, 2);
    assert_eq!(archive_entries(&archive), set(&["proc1/a.tif", "proc1/b.tif"]));
    assert_eq!(
        archive_entry_content(&archive, "proc1/b.tif"),
        "content of proc1/b.tif"
    );
}

#[tokio::test]
async fn test_nested_image_folders_keep_relative_names() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let source = temp_dir.path().join("images/proc1");
    fs::create_dir_all(source.join("thumbs/small")).unwrap();
    fs::write(source.join("thumbs/small/a.jpg"), b"thumb").unwrap();
    let config = job_config(temp_dir.path(), vec![proc1]);
    let archive = config.archive_path();

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert!(summary.is_successful());
    assert_eq!(summary.files_copied, 2);
    // Directories never get entries of their own.
    assert_eq!(
        archive_entries(&archive),
        set(&["proc1/a.tif", "proc1/thumbs/small/a.jpg"])
    );
}

#[test_case(TaskStatus::Deactivated, true ; "deactivated finish step excludes")]
#[test_case(TaskStatus::Done, false ; "done finish step exports")]
#[test_case(TaskStatus::Open, false ; "open finish step exports")]
#[test_case(TaskStatus::Locked, false ; "locked finish step exports")]
#[tokio::test]
async fn test_finish_step_status(status: TaskStatus, excluded: bool) {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"])
        .with_task(TaskRecord::new("Scanning", TaskStatus::Done))
        .with_task(TaskRecord::new("Export", status));
    let config = job_config(temp_dir.path(), vec![proc1]);
    let out = config.export_folder.clone();

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert_eq!(summary.excluded, usize::from(excluded));
    assert_eq!(out.join("ProjA/proc1/a.tif").exists(), !excluded);
    let expected = if excluded { set(&[]) } else { set(&["proc1/a.tif"]) };
    assert_eq!(archive_entries(&out.join("ProjA.zip")), expected);
}

#[tokio::test]
async fn test_deactivated_task_with_other_title_does_not_exclude() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"])
        .with_task(TaskRecord::new("Quality check", TaskStatus::Deactivated));
    let config = job_config(temp_dir.path(), vec![proc1]);

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert_eq!(summary.excluded, 0);
    assert_eq!(summary.copied, 1);
}

#[tokio::test]
async fn test_failing_process_does_not_stop_the_others() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let proc2 = process_with_files(temp_dir.path(), "proc2", &["c.tif"]);
    let proc3 = process_with_files(temp_dir.path(), "proc3", &["d.tif"]);
    let storage = FailingStorage::failing_copy(temp_dir.path().join("images/proc2"));
    let config = job_config(temp_dir.path(), vec![proc1, proc2, proc3]);
    let archive = config.archive_path();
    let notifier = Arc::new(CollectingNotifier::new());

    let summary = ExportJob::new(config, Arc::new(storage))
        .with_notifier(notifier.clone())
        .run()
        .await;

    assert_eq!(summary.state, JobState::Done);
    assert_eq!(summary.copied, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Copy);
    assert_eq!(summary.failures[0].process.as_deref(), Some("proc2"));
    assert!(!summary.is_successful());

    assert_eq!(archive_entries(&archive), set(&["proc1/a.tif", "proc3/d.tif"]));
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_unlistable_image_folder_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let proc2 = process_with_files(temp_dir.path(), "proc2", &["b.tif"]);
    let storage = FailingStorage::failing_list(temp_dir.path().join("images/proc1"));
    let config = job_config(temp_dir.path(), vec![proc1, proc2]);
    let out = config.export_folder.clone();

    let summary = ExportJob::new(config, Arc::new(storage)).run().await;

    assert_eq!(summary.state, JobState::Done);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.copied, 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Copy);
    assert_eq!(summary.failures[0].process.as_deref(), Some("proc1"));
    assert!(!out.join("ProjA/proc1").exists());
    assert_eq!(archive_entries(&out.join("ProjA.zip")), set(&["proc2/b.tif"]));
}

#[tokio::test]
async fn test_unwritable_archive_is_reported_as_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    // A directory where the archive should go can be neither deleted nor created.
    fs::create_dir_all(config.archive_path()).unwrap();
    let out = config.export_folder.clone();

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert_eq!(summary.state, JobState::Done);
    assert_eq!(summary.copied, 1);
    assert!(out.join("ProjA/proc1/a.tif").is_file());
    assert!(summary.archive_path.is_none());
    assert_eq!(summary.archive_entries, 0);
    assert!(summary
        .failures
        .iter()
        .any(|f| f.kind == FailureKind::Archive));
    assert_eq!(exit_code(&summary), EXIT_FATAL);
}

#[tokio::test]
async fn test_shutdown_without_predecessor_is_interrupted_exit() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    let out = config.export_folder.clone();
    let (_shutdown_tx, shutdown_rx) = watch::channel(true);

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .with_shutdown_signal(shutdown_rx)
        .run()
        .await;

    assert_eq!(summary.state, JobState::Aborted);
    assert_eq!(summary.failures[0].kind, FailureKind::Interrupted);
    assert_eq!(exit_code(&summary), EXIT_INTERRUPTED);
    assert!(!out.join("ProjA").exists());
    assert!(!out.join("ProjA.zip").exists());
}

#[tokio::test]
async fn test_rerun_replaces_archive() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif", "b.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    let archive = config.archive_path();
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new());

    let first = ExportJob::new(config.clone(), storage.clone()).run().await;
    let second = ExportJob::new(config, storage).run().await;

    assert!(first.is_successful());
    assert!(second.is_successful());
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(second.archive_entries, 2);
    assert_eq!(archive_entries(&archive), set(&["proc1/a.tif", "proc1/b.tif"]));
}

#[tokio::test]
async fn test_stale_archive_is_replaced_not_merged() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    let archive = config.archive_path();
    fs::write(&archive, b"stale bytes that are not a zip file").unwrap();

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;

    assert!(summary.is_successful());
    assert_eq!(archive_entries(&archive), set(&["proc1/a.tif"]));
}

#[tokio::test]
async fn test_failed_stale_delete_is_recorded_and_archive_still_built() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    let archive = config.archive_path();
    fs::write(&archive, b"stale").unwrap();

    let summary = ExportJob::new(config, Arc::new(FailingStorage::failing_delete()))
        .run()
        .await;

    assert_eq!(summary.state, JobState::Done);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::StaleArchive);
    assert_eq!(summary.archive_path.as_deref(), Some(archive.as_path()));
    assert_eq!(archive_entries(&archive), set(&["proc1/a.tif"]));
}

#[tokio::test]
async fn test_shutdown_before_predecessor_finishes_exports_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);
    let out = config.export_folder.clone();
    let notifier = Arc::new(CollectingNotifier::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let predecessor = tokio::spawn(std::future::pending::<()>());
    let job = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .with_notifier(notifier.clone())
        .with_predecessor(predecessor)
        .with_shutdown_signal(shutdown_rx)
        .spawn();

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    shutdown_tx.send(true).unwrap();
    let summary = job.await.unwrap();

    assert_eq!(summary.state, JobState::Aborted);
    assert_eq!(summary.failures[0].kind, FailureKind::Dependency);
    assert_eq!(notifier.errors(), vec![FATAL_NOTIFICATION.to_string()]);
    assert!(!out.join("ProjA").exists());
    assert!(!out.join("ProjA.zip").exists());
}

#[tokio::test]
async fn test_chained_exports() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let proc2 = process_with_files(temp_dir.path(), "proc2", &["b.tif"]);
    let first = job_config(temp_dir.path(), vec![proc1]);
    let mut second = job_config(temp_dir.path(), vec![proc2]);
    second.project_name = "ProjB".to_string();
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new());

    let predecessor = ExportJob::new(first.clone(), storage.clone()).spawn();
    let summary = ExportJob::new(second.clone(), storage)
        .with_predecessor(predecessor)
        .run()
        .await;

    assert!(summary.is_successful());
    assert_eq!(archive_entries(&first.archive_path()), set(&["proc1/a.tif"]));
    assert_eq!(archive_entries(&second.archive_path()), set(&["proc2/b.tif"]));
}

#[tokio::test]
async fn test_summary_serializes_to_json() {
    let temp_dir = TempDir::new().unwrap();
    let proc1 = process_with_files(temp_dir.path(), "proc1", &["a.tif"]);
    let config = job_config(temp_dir.path(), vec![proc1]);

    let summary = ExportJob::new(config, Arc::new(LocalStorage::new()))
        .run()
        .await;
    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["project_name"], "ProjA");
    assert_eq!(json["state"], "done");
    assert_eq!(json["copied"], 1);
    assert_eq!(json["archive_entries"], 1);
}
