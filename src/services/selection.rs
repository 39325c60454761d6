use crate::config::IntakeConfig;
use crate::models::{
    BatchOutcome, EntryId, FileEntry, FileStatus, FileView, RawFile, RejectReason, Rejection,
    Snapshot,
};
use crate::services::preview::{PreviewBackend, PreviewManager};
use crate::utils::dedup::DedupIndex;
use crate::utils::validation;
use std::sync::Arc;

/// Authoritative ordered selection of accepted files.
///
/// All mutation goes through `&mut self`; observers only ever see
/// [`Snapshot`]s. Dropping the store releases every preview it still holds.
#[derive(Debug)]
pub struct SelectionStore {
    config: IntakeConfig,
    previews: PreviewManager,
    entries: Vec<FileEntry>,
}

impl SelectionStore {
    pub fn new(config: IntakeConfig, backend: Arc<dyn PreviewBackend>) -> Self {
        Self {
            config,
            previews: PreviewManager::new(backend),
            entries: Vec::new(),
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.config.max_files.saturating_sub(self.entries.len())
    }

    /// Admits a batch of files in input order.
    ///
    /// A batch that would push the selection over `max_files` is rejected as a
    /// whole with a single `CapacityExceeded` rejection named after the first
    /// file of the batch. Otherwise each file is
    /// validated, deduplicated against the selection and the files already
    /// accepted from this batch, and appended.
    pub fn add_batch(&mut self, raw_files: Vec<RawFile>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        if raw_files.is_empty() {
            return outcome;
        }

        // 1. Capacity check
        if self.entries.len() + raw_files.len() > self.config.max_files {
            tracing::warn!(
                "Batch of {} rejected: selection holds {} of {} files",
                raw_files.len(),
                self.entries.len(),
                self.config.max_files
            );
            outcome.rejected.push(Rejection::new(
                raw_files[0].name.clone(),
                RejectReason::CapacityExceeded {
                    max_files: self.config.max_files,
                },
            ));
            return outcome;
        }

        let mut index = DedupIndex::from_keys(self.entries.iter().map(FileEntry::dedup_key));

        for file in raw_files {
            // 2. Validation
            if let Err(reason) = validation::validate(&file, &self.config) {
                tracing::debug!("Rejected {}: {}", file.name, reason);
                outcome.rejected.push(Rejection::new(file.name, reason));
                continue;
            }

            // 3. Deduplication
            let key = file.dedup_key();
            if index.is_duplicate(&key) {
                tracing::debug!("Rejected {}: duplicate", file.name);
                outcome
                    .rejected
                    .push(Rejection::new(file.name, RejectReason::DuplicateFile));
                continue;
            }
            index.insert(key);

            // 4. Preview + append
            let preview = self.previews.acquire(&file);
            let entry = FileEntry::accept(file, preview);
            tracing::debug!("Accepted {} as {}", entry.name(), entry.id());
            outcome.accepted.push(entry.view());
            self.entries.push(entry);
        }

        tracing::info!(
            "Batch processed: {} accepted, {} rejected, {} selected",
            outcome.accepted.len(),
            outcome.rejected.len(),
            self.entries.len()
        );

        outcome
    }

    /// Removes an entry and releases its preview. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let Some(position) = self.entries.iter().position(|e| e.id() == id) else {
            tracing::debug!("Remove ignored, no entry {}", id);
            return false;
        };

        let entry = self.entries.remove(position);
        tracing::debug!("Removed {} ({})", entry.name(), id);
        if let Some(preview) = entry.into_preview() {
            self.previews.release(preview);
        }
        true
    }

    /// Releases every preview, then empties the selection. Returns the number
    /// of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        if removed == 0 {
            return 0;
        }

        for entry in self.entries.drain(..) {
            if let Some(preview) = entry.into_preview() {
                self.previews.release(preview);
            }
        }

        tracing::debug!("Cleared {} entries", removed);
        removed
    }

    /// Updates an entry's upload status; returns false if the id is unknown or
    /// the status is unchanged.
    pub fn set_status(&mut self, id: EntryId, status: FileStatus) -> bool {
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) if entry.status != status => {
                entry.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: EntryId) -> Option<FileView> {
        self.entries
            .iter()
            .find(|e| e.id() == id)
            .map(FileEntry::view)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.entries.iter().map(FileEntry::view).collect()
    }
}
