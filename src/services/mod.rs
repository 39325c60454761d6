pub mod drag_drop;
pub mod intake;
pub mod notifier;
pub mod preview;
pub mod selection;
