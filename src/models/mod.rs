use crate::services::preview::PreviewHandle;
use crate::utils::dedup::DedupKey;
use crate::utils::validation::parse_mime;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// A file as handed over by the picker or a drop, before acceptance.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    /// Size in bytes as reported by the platform
    pub size: u64,
    /// Content type as reported by the platform; may be empty
    pub mime_type: String,
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds a file whose size is the length of its content
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self::new(name, bytes.len() as u64, mime_type, bytes)
    }

    /// A file known only by its metadata, with no content attached
    pub fn declared(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self::new(name, size, mime_type, Bytes::new())
    }

    /// Lowercase MIME essence, or an empty string if the platform gave none
    pub fn essence(&self) -> String {
        parse_mime(&self.mime_type)
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default()
    }

    pub fn is_image(&self) -> bool {
        parse_mime(&self.mime_type).is_some_and(|m| m.type_() == mime::IMAGE)
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.name.clone(), self.size)
    }
}

/// Session-unique identifier of an accepted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upload status; only the external upload workflow moves it past `Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[default]
    Ready,
    Uploading,
    Error,
}

/// Image files carry their preview handle; everything else is a document.
#[derive(Debug)]
pub enum FileKind {
    Image { preview: PreviewHandle },
    Document,
}

/// One accepted file, owned by the selection store
#[derive(Debug)]
pub struct FileEntry {
    pub(crate) id: EntryId,
    pub(crate) name: String,
    pub(crate) size: u64,
    pub(crate) mime_type: String,
    pub(crate) source: Bytes,
    pub(crate) kind: FileKind,
    pub(crate) status: FileStatus,
    pub(crate) added_at: DateTime<Utc>,
}

impl FileEntry {
    /// Takes ownership of the raw file's content. `preview` must be present
    /// exactly when the file is an image. The MIME type is stored as its
    /// normalized essence.
    pub(crate) fn accept(file: RawFile, preview: Option<PreviewHandle>) -> Self {
        let kind = match preview {
            Some(preview) => FileKind::Image { preview },
            None => FileKind::Document,
        };

        let mime_type = file.essence();

        Self {
            id: EntryId::new(),
            name: file.name,
            size: file.size,
            mime_type,
            source: file.bytes,
            kind,
            status: FileStatus::Ready,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub fn preview_url(&self) -> Option<&str> {
        match &self.kind {
            FileKind::Image { preview } => Some(preview.url()),
            FileKind::Document => None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.name.clone(), self.size)
    }

    /// Consumes the entry, handing back its preview handle for release
    pub(crate) fn into_preview(self) -> Option<PreviewHandle> {
        match self.kind {
            FileKind::Image { preview } => Some(preview),
            FileKind::Document => None,
        }
    }

    pub fn view(&self) -> FileView {
        FileView {
            id: self.id,
            name: self.name.clone(),
            size: self.size,
            mime_type: self.mime_type.clone(),
            status: self.status,
            preview_url: self.preview_url().map(str::to_string),
            source: self.source.clone(),
            added_at: self.added_at,
        }
    }
}

/// Read-only copy of an entry handed to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileView {
    pub id: EntryId,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub status: FileStatus,
    pub preview_url: Option<String>,
    #[serde(skip)]
    pub source: Bytes,
    pub added_at: DateTime<Utc>,
}

/// Immutable ordered view of the whole selection
pub type Snapshot = Arc<[FileView]>;

/// Why a file (or a whole batch) was not admitted
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("Selection is limited to {max_files} files")]
    CapacityExceeded { max_files: usize },

    #[error("File size {size} bytes exceeds maximum allowed {max_size} bytes")]
    TooLarge { size: u64, max_size: u64 },

    #[error("File type '{mime_type}' is not accepted")]
    InvalidType { mime_type: String },

    #[error("File is already selected")]
    DuplicateFile,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            RejectReason::TooLarge { .. } => "FILE_TOO_LARGE",
            RejectReason::InvalidType { .. } => "INVALID_FILE_TYPE",
            RejectReason::DuplicateFile => "DUPLICATE_FILE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

impl Rejection {
    pub fn new(name: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

/// Result of one `add_batch` pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub accepted: Vec<FileView>,
    pub rejected: Vec<Rejection>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}
