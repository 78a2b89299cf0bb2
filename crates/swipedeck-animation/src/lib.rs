//! Animation system for SwipeDeck
//!
//! Frame-driven tween, spring and decay animations over `f32` values, plus
//! the interpolation and fan-in helpers the swipe widget composes them with.

mod animatable;
mod animation;
mod decay_spec;
mod interpolation;
mod parallel;

pub use animatable::{Animatable, AnimatableXY};
pub use animation::{
    AnimationEndReason, AnimationResult, AnimationSpec, AnimationSpecError, AnimationType,
    Easing, SpringSpec,
};
pub use decay_spec::{ExponentialDecaySpec, FloatDecayAnimationSpec};
pub use interpolation::{Extrapolate, Interpolation, InterpolationError};
pub use parallel::ParallelGroup;
