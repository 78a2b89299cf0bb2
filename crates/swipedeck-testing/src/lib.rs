//! Testing utilities and harness for SwipeDeck

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
    pub use swipedeck_graphics::Point;
    pub use swipedeck_ui::{CardTransform, SwipePhase, SwipeStackConfig};
}
