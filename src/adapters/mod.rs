//! Boundary adapters for the export job.
//!
//! - [`storage`] - Storage abstraction ([`StorageProvider`]) and the local
//!   filesystem implementation ([`LocalStorage`])
//! - [`notify`] - User-facing notification sinks ([`Notifier`])
//!
//! # Design Pattern
//!
//! The job receives its collaborators as trait objects, so hosts can supply
//! their own storage and tests can inject failing fakes:
//!
//! ```rust
//! use project_export::adapters::{CollectingNotifier, LocalStorage, Notifier, StorageProvider};
//! use std::sync::Arc;
//!
//! let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new());
//! let notifier: Arc<dyn Notifier> = Arc::new(CollectingNotifier::new());
//! # let _ = (storage, notifier);
//! ```

pub mod notify;
pub mod storage;

pub use notify::{CollectingNotifier, LogNotifier, Notification, NotificationLevel, Notifier};
pub use storage::{LocalStorage, StorageProvider};
