//! Drop-zone state machine.
//!
//! Translates drag events and picker selections into uniform add-batch
//! requests. Each event sets the state its type implies; there is no queue
//! and no debouncing.

use crate::models::RawFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DragActive,
}

/// Platform drag events delivered to the drop zone.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    /// Drop carrying the dragged file list
    Drop(Vec<RawFile>),
}

/// Effects produced by the controller.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Nothing to forward.
    None,
    /// Files to hand to the selection store.
    AddBatch(Vec<RawFile>),
}

/// Outcome of handling one drag event.
#[derive(Debug, Clone)]
pub struct Handled {
    /// Whether the platform's default action (e.g. navigating to the dropped
    /// file) must be suppressed. Always true for drop-zone events.
    pub prevent_default: bool,
    pub effect: Effect,
}

#[derive(Debug, Clone)]
pub struct DragDropController {
    state: DragState,
    multiple: bool,
}

impl DragDropController {
    pub fn new(multiple: bool) -> Self {
        Self {
            state: DragState::Idle,
            multiple,
        }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_drag_active(&self) -> bool {
        self.state == DragState::DragActive
    }

    /// Handle a drag event.
    pub fn handle(&mut self, event: DragEvent) -> Handled {
        let effect = match event {
            DragEvent::Enter | DragEvent::Over => {
                self.state = DragState::DragActive;
                Effect::None
            }
            DragEvent::Leave => {
                self.state = DragState::Idle;
                Effect::None
            }
            DragEvent::Drop(files) => {
                self.state = DragState::Idle;
                self.normalize(files)
            }
        };

        Handled {
            prevent_default: true,
            effect,
        }
    }

    /// Normalize a picker selection. The drag state is left untouched.
    pub fn picker_change(&self, files: Vec<RawFile>) -> Effect {
        self.normalize(files)
    }

    fn normalize(&self, mut files: Vec<RawFile>) -> Effect {
        if files.is_empty() {
            return Effect::None;
        }
        if !self.multiple && files.len() > 1 {
            tracing::debug!(
                "Single-file intake, ignoring {} extra files",
                files.len() - 1
            );
            files.truncate(1);
        }
        Effect::AddBatch(files)
    }
}
