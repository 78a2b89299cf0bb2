//! Swipe card stack widget for SwipeDeck
//!
//! A headless "swipe to dismiss" card deck: the host supplies cards, pointer
//! events and frame ticks, and paints the returned [`RenderList`].

mod card;
mod card_queue;
mod config;
mod error;
mod renderer;
mod swipe_policy;
mod swipe_stack;

pub use card::{CardId, CardRecord};
pub use card_queue::CardQueue;
pub use config::SwipeStackConfig;
pub use error::SwipeError;
pub use renderer::{render_layers, CardLayer, CardTransform, RenderList};
pub use swipe_policy::{SwipeDecision, SwipeDirection, SwipePolicy};
pub use swipe_stack::{AnimationState, DismissedCard, SwipePhase, SwipeStack};

// Re-export the input and geometry types hosts need to talk to the stack.
pub use swipedeck_foundation::{PointerEvent, PointerEventKind, PointerId};
pub use swipedeck_graphics::{Degrees, Point, Rect, Size};
