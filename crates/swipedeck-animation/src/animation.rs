//! Animation specifications: easing curves, tweens and springs.

use std::fmt;

/// Easing functions for tween animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material "standard" curve.
    FastOutSlowIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction in `[0, 1]`.
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Evaluate a CSS-style cubic bezier with endpoints (0,0) and (1,1) at `x`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Polynomial coefficients for one axis of the curve.
    let coefficients = |p1: f32, p2: f32| {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    };
    let (ax, bx, cx) = coefficients(x1, x2);
    let (ay, by, cy) = coefficients(y1, y2);
    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |t: f32| (3.0 * ax * t + 2.0 * bx) * t + cx;

    let mut t = x;
    let mut solved = false;
    for _ in 0..8 {
        let error = sample(ax, bx, cx, t) - x;
        if error.abs() < 1e-6 {
            solved = true;
            break;
        }
        let derivative = slope(t);
        if derivative.abs() < 1e-6 {
            break;
        }
        t = (t - error / derivative).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut low, mut high) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..20 {
            let error = sample(ax, bx, cx, t) - x;
            if error.abs() < 1e-6 {
                break;
            }
            if error > 0.0 {
                high = t;
            } else {
                low = t;
            }
            t = 0.5 * (low + high);
        }
    }

    sample(ay, by, cy, t)
}

/// Time-based tween: duration, easing and an optional start delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }

    /// Delay plus duration must fit in nanoseconds.
    pub fn validate(&self) -> Result<(), AnimationSpecError> {
        self.delay_millis
            .checked_add(self.duration_millis)
            .and_then(|total| total.checked_mul(1_000_000))
            .map(|_| ())
            .ok_or(AnimationSpecError::new(
                "duration_millis",
                "delay plus duration overflows nanoseconds",
            ))
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowIn)
    }
}

/// Damped harmonic oscillator with unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = bouncy, > 1.0 = over-damped.
    pub damping_ratio: f32,
    pub stiffness: f32,
    /// Speed (units/s) below which the spring may settle.
    pub velocity_threshold: f32,
    /// Distance from target below which the spring may settle.
    pub position_threshold: f32,
}

impl SpringSpec {
    pub const DEFAULT_TENSION: f32 = 40.0;
    pub const DEFAULT_FRICTION: f32 = 7.0;

    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    /// Build a spring from origami-style `friction` and `tension` values.
    ///
    /// Origami maps tension to stiffness as `(t - 30) * 3.62 + 194` and
    /// friction to a damping coefficient as `(f - 8) * 3 + 25`.
    pub fn from_friction_tension(friction: f32, tension: f32) -> Self {
        let stiffness = if tension == 0.0 {
            0.0
        } else {
            (tension - 30.0) * 3.62 + 194.0
        };
        let damping = if friction == 0.0 {
            0.0
        } else {
            (friction - 8.0) * 3.0 + 25.0
        };
        let damping_ratio = if stiffness > 0.0 {
            damping / (2.0 * stiffness.sqrt())
        } else {
            0.0
        };
        Self::new(damping_ratio, stiffness)
    }

    /// Damping coefficient `c` of `F = -k x - c v`.
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }

    pub fn with_thresholds(mut self, velocity_threshold: f32, position_threshold: f32) -> Self {
        self.velocity_threshold = velocity_threshold;
        self.position_threshold = position_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), AnimationSpecError> {
        if !self.stiffness.is_finite() || self.stiffness <= 0.0 {
            return Err(AnimationSpecError::new("stiffness", "must be positive"));
        }
        if !self.damping_ratio.is_finite() || self.damping_ratio <= 0.0 {
            return Err(AnimationSpecError::new(
                "damping_ratio",
                "must be positive",
            ));
        }
        if !(self.velocity_threshold > 0.0 && self.position_threshold > 0.0) {
            return Err(AnimationSpecError::new(
                "threshold",
                "rest thresholds must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::from_friction_tension(Self::DEFAULT_FRICTION, Self::DEFAULT_TENSION)
    }
}

/// Animation driving a value towards a fixed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(AnimationSpec),
    Spring(SpringSpec),
}

impl AnimationType {
    pub fn validate(&self) -> Result<(), AnimationSpecError> {
        match self {
            AnimationType::Tween(spec) => spec.validate(),
            AnimationType::Spring(spec) => spec.validate(),
        }
    }
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Tween(AnimationSpec::default())
    }
}

/// Why an animation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnimationEndReason {
    /// Reached its target or came to rest.
    Finished,
    /// Cancelled by `stop`, `snap_to` or a newer animation.
    Interrupted,
    /// Left the value's bounds and was clamped.
    BoundReached,
}

impl AnimationEndReason {
    /// Combine the outcomes of animations running together.
    ///
    /// `BoundReached` dominates `Interrupted`, which dominates `Finished`.
    pub fn merge(self, other: AnimationEndReason) -> AnimationEndReason {
        self.max(other)
    }
}

/// Delivered to completion callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationResult {
    pub end_reason: AnimationEndReason,
    pub end_value: f32,
}

impl AnimationResult {
    /// True only when the animation reached its target or came to rest.
    pub fn finished(&self) -> bool {
        self.end_reason == AnimationEndReason::Finished
    }
}

/// A malformed animation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSpecError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl AnimationSpecError {
    pub fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

impl fmt::Display for AnimationSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid animation spec `{}`: {}", self.field, self.reason)
    }
}

impl std::error::Error for AnimationSpecError {}
