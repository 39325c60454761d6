use crate::config::IntakeConfig;
use crate::models::{BatchOutcome, EntryId, FileStatus, FileView, RawFile, Snapshot};
use crate::services::drag_drop::{DragDropController, DragEvent, DragState, Effect};
use crate::services::notifier::{self, NotificationSink};
use crate::services::preview::PreviewBackend;
use crate::services::selection::SelectionStore;
use std::fmt;
use std::sync::Arc;

/// Observer invoked with the full ordered selection after every change
pub type ChangeCallback = Box<dyn FnMut(&[FileView]) + Send>;

/// Result of routing one drag event through the intake
#[derive(Debug, Clone)]
pub struct EventResponse {
    pub prevent_default: bool,
    /// Present when the event carried files to the store
    pub outcome: Option<BatchOutcome>,
}

/// The owning view's side of the intake manager: wires the drop zone and the
/// picker into the selection store, fires change callbacks and announces
/// batch outcomes to the notification sink.
pub struct FileIntake {
    store: SelectionStore,
    controller: DragDropController,
    sink: Arc<dyn NotificationSink>,
    on_files_change: Option<ChangeCallback>,
}

impl FileIntake {
    pub fn new(
        config: IntakeConfig,
        backend: Arc<dyn PreviewBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let controller = DragDropController::new(config.multiple);
        Self {
            store: SelectionStore::new(config, backend),
            controller,
            sink,
            on_files_change: None,
        }
    }

    pub fn on_files_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&[FileView]) + Send + 'static,
    {
        self.on_files_change = Some(Box::new(callback));
        self
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn drag_state(&self) -> DragState {
        self.controller.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn handle_drag_event(&mut self, event: DragEvent) -> EventResponse {
        let handled = self.controller.handle(event);
        EventResponse {
            prevent_default: handled.prevent_default,
            outcome: self.apply(handled.effect),
        }
    }

    pub fn handle_picker_change(&mut self, files: Vec<RawFile>) -> Option<BatchOutcome> {
        let effect = self.controller.picker_change(files);
        self.apply(effect)
    }

    /// Adds files directly, bypassing the drop-zone normalization
    pub fn add_files(&mut self, files: Vec<RawFile>) -> BatchOutcome {
        let outcome = self.store.add_batch(files);
        notifier::announce(&outcome, self.sink.as_ref());
        if !outcome.accepted.is_empty() {
            self.notify_change();
        }
        outcome
    }

    pub fn remove(&mut self, id: EntryId) -> bool {
        let removed = self.store.remove(id);
        if removed {
            self.notify_change();
        }
        removed
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.store.clear();
        if removed > 0 {
            self.notify_change();
        }
        removed
    }

    /// Hook for the upload workflow to report progress on an entry
    pub fn set_status(&mut self, id: EntryId, status: FileStatus) -> bool {
        let changed = self.store.set_status(id, status);
        if changed {
            self.notify_change();
        }
        changed
    }

    fn apply(&mut self, effect: Effect) -> Option<BatchOutcome> {
        match effect {
            Effect::None => None,
            Effect::AddBatch(files) => Some(self.add_files(files)),
        }
    }

    fn notify_change(&mut self) {
        if let Some(callback) = self.on_files_change.as_mut() {
            let snapshot = self.store.snapshot();
            callback(&snapshot);
        }
    }
}

impl fmt::Debug for FileIntake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileIntake")
            .field("store", &self.store)
            .field("controller", &self.controller)
            .field("has_callback", &self.on_files_change.is_some())
            .finish_non_exhaustive()
    }
}
