//! Shared gesture constants.
//!
//! Values are in logical pixels.

use crate::PointerId;

/// Maximum release velocity in logical pixels per second.
///
/// Matches Android's default maximum fling velocity on a baseline density.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// The only pointer a drag gesture follows.
pub const PRIMARY_POINTER: PointerId = 0;
