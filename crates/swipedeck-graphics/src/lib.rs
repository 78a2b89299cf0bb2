//! Pure math/data for SwipeDeck
//!
//! Geometry primitives and angle units shared by the animation engine, the
//! gesture layer and the card renderer.

mod geometry;
mod unit;

pub use geometry::*;
pub use unit::*;
