//! Core runtime for SwipeDeck.
//!
//! Everything in the widget runs on one cooperative event loop. The host owns
//! a [`Runtime`], feeds it frame ticks through
//! [`RuntimeHandle::drain_frame_callbacks`], and animations schedule their
//! next step through the [`FrameClock`].

mod frame_clock;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle};

/// Nanoseconds between two frames at ~60 fps.
pub const FRAME_INTERVAL_NANOS: u64 = 16_666_667;
