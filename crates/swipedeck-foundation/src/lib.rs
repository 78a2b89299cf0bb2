//! Pointer input and gesture tracking for SwipeDeck

mod drag_gesture;
pub mod gesture_constants;
mod input;
mod velocity_tracker;

pub use drag_gesture::{DragEvent, DragGestureTracker, DragRelease};
pub use input::{PointerEvent, PointerEventKind, PointerId};
pub use velocity_tracker::{VelocityTracker, VelocityTracker1D, ASSUME_STOPPED_MS};
