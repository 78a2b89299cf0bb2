//! Decay animation specifications.
//!
//! A decay animation has no target: it starts with a velocity and slows
//! down until it comes to rest. Velocities are in units per second.

use crate::AnimationSpecError;

/// Trait for decay animation specifications.
pub trait FloatDecayAnimationSpec {
    /// Speed below which the animation is considered at rest.
    fn abs_velocity_threshold(&self) -> f32;

    /// Position after `play_time_nanos`.
    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Velocity after `play_time_nanos`.
    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    /// Time until the velocity drops below the threshold.
    fn get_duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> i64;

    /// Reject configurations the animation could never run with.
    fn validate(&self) -> Result<(), AnimationSpecError> {
        Ok(())
    }

    /// Resting position.
    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        let duration = self.get_duration_nanos(initial_value, initial_velocity);
        self.get_value_from_nanos(duration, initial_value, initial_velocity)
    }
}

/// Friction decay where the velocity is multiplied by `deceleration` every
/// millisecond.
///
/// With `k = 1 - deceleration` and `v` in units per millisecond the position is
/// `x(t) = x0 + v / k * (1 - e^(-k t))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    pub deceleration: f32,
    pub velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    pub const DEFAULT_DECELERATION: f32 = 0.998;
    /// Roughly 0.1 units of travel per 60 fps frame.
    pub const DEFAULT_VELOCITY_THRESHOLD: f32 = 6.0;

    pub fn new(deceleration: f32) -> Self {
        Self {
            deceleration,
            velocity_threshold: Self::DEFAULT_VELOCITY_THRESHOLD,
        }
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold;
        self
    }

    /// Decay rate per millisecond.
    fn rate(&self) -> f64 {
        1.0 - self.deceleration as f64
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DECELERATION)
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn validate(&self) -> Result<(), AnimationSpecError> {
        if !(self.deceleration > 0.0 && self.deceleration < 1.0) {
            return Err(AnimationSpecError::new(
                "deceleration",
                "must be strictly between 0 and 1",
            ));
        }
        if !self.velocity_threshold.is_finite() || self.velocity_threshold <= 0.0 {
            return Err(AnimationSpecError::new(
                "velocity_threshold",
                "must be positive",
            ));
        }
        Ok(())
    }

    fn abs_velocity_threshold(&self) -> f32 {
        self.velocity_threshold
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let time_ms = play_time_nanos.max(0) as f64 / 1_000_000.0;
        let velocity_per_ms = initial_velocity as f64 / 1000.0;
        let k = self.rate();
        let travelled = velocity_per_ms / k * (1.0 - (-k * time_ms).exp());
        initial_value + travelled as f32
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let time_ms = play_time_nanos.max(0) as f64 / 1_000_000.0;
        (initial_velocity as f64 * (-self.rate() * time_ms).exp()) as f32
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        let speed = initial_velocity.abs();
        if speed <= self.velocity_threshold {
            return 0;
        }
        let time_ms = (speed as f64 / self.velocity_threshold as f64).ln() / self.rate();
        (time_ms * 1_000_000.0) as i64
    }
}
