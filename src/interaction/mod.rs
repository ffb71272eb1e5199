//! Pointer-driven interaction state machines.
//!
//! Each controller is an independent state machine fed `(event, timestamp)`
//! pairs by the viewer; none of them touch platform APIs, so all of them are
//! testable with a manually advanced clock.

pub mod auto_scroll;
pub mod drag;
pub mod resize;
pub mod selection;
pub mod smart_click;

pub use auto_scroll::AutoScrollController;
pub use drag::DragReorderController;
pub use resize::ColumnResizeController;
pub use selection::{ClickModifiers, SelectionController};
pub use smart_click::{ClickOutcome, SmartClickDisambiguator};
