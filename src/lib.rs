//! Multi-file intake manager.
//!
//! Accepts batches of user-selected files from a picker or a drop zone,
//! validates them against size and type rules, rejects duplicates, enforces a
//! selection cap and owns the lifetime of image preview references.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use config::IntakeConfig;
pub use error::IntakeError;
pub use models::{
    BatchOutcome, EntryId, FileKind, FileStatus, FileView, RawFile, RejectReason, Rejection,
    Snapshot,
};
pub use services::drag_drop::{DragDropController, DragEvent, DragState};
pub use services::intake::FileIntake;
pub use services::notifier::{Notification, NotificationSink};
pub use services::preview::{BlobUrlBackend, NoOpPreviewBackend, PreviewBackend, PreviewHandle};
pub use services::selection::SelectionStore;
