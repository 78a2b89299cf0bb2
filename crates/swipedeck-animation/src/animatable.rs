//! Frame-driven animated values.
//!
//! An [`Animatable`] owns one `f32` and moves it towards a target (tween or
//! spring) or lets it coast (decay). Each step runs inside a frame callback of
//! the owning runtime; nothing here reads a wall clock.

use std::cell::RefCell;
use std::rc::Rc;

use swipedeck_core::{FrameCallbackRegistration, RuntimeHandle};
use swipedeck_graphics::{Point, Rect};

use crate::{
    AnimationEndReason, AnimationResult, AnimationSpec, AnimationType, FloatDecayAnimationSpec,
    ParallelGroup, SpringSpec,
};

/// Integration step for spring physics.
const SPRING_TIMESTEP_SECONDS: f32 = 0.004;
/// Longest frame gap a spring integrates in one step; longer gaps are
/// truncated.
const MAX_SPRING_FRAME_NANOS: u64 = 1_000_000_000;

type OnEnd = Box<dyn FnOnce(AnimationResult)>;

enum Motion {
    Idle,
    Tween {
        spec: AnimationSpec,
        from: f32,
        target: f32,
    },
    Spring {
        spec: SpringSpec,
        target: f32,
    },
    Decay {
        spec: Box<dyn FloatDecayAnimationSpec>,
        from: f32,
        initial_velocity: f32,
    },
}

/// Value and velocity produced by one frame step.
struct FrameStep {
    value: f32,
    velocity: f32,
    settled: bool,
}

struct AnimatableInner {
    label: &'static str,
    runtime: RuntimeHandle,
    value: f32,
    velocity: f32,
    lower_bound: Option<f32>,
    upper_bound: Option<f32>,
    motion: Motion,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    /// Bumped whenever the running animation changes so stale frame
    /// callbacks from the same drain can be ignored.
    generation: u64,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<OnEnd>,
}

impl AnimatableInner {
    fn clamp(&self, value: f32) -> f32 {
        let value = self.lower_bound.map_or(value, |lower| value.max(lower));
        self.upper_bound.map_or(value, |upper| value.min(upper))
    }

    fn step(&mut self, frame_time_nanos: u64) -> Option<AnimationEndReason> {
        let start = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let previous = self.last_frame_nanos.replace(frame_time_nanos);
        let play_time_nanos = frame_time_nanos.saturating_sub(start);

        let step = match self.motion {
            Motion::Idle => return Some(AnimationEndReason::Finished),
            Motion::Tween { spec, from, target } => {
                let delay_nanos = spec.delay_millis.saturating_mul(1_000_000);
                if play_time_nanos < delay_nanos {
                    return None;
                }
                let duration_nanos = spec.duration_millis.saturating_mul(1_000_000).max(1);
                let linear = ((play_time_nanos - delay_nanos) as f32 / duration_nanos as f32)
                    .clamp(0.0, 1.0);
                if linear >= 1.0 {
                    FrameStep {
                        value: target,
                        velocity: 0.0,
                        settled: true,
                    }
                } else {
                    FrameStep {
                        value: from + (target - from) * spec.easing.transform(linear),
                        velocity: 0.0,
                        settled: false,
                    }
                }
            }
            Motion::Spring { spec, target } => {
                let elapsed = previous
                    .map(|previous| frame_time_nanos.saturating_sub(previous))
                    .unwrap_or(0)
                    .min(MAX_SPRING_FRAME_NANOS) as f32
                    / 1_000_000_000.0;
                let substeps = (elapsed / SPRING_TIMESTEP_SECONDS).ceil() as u32;
                let dt = if substeps == 0 {
                    0.0
                } else {
                    elapsed / substeps as f32
                };
                let damping = spec.damping();
                let mut value = self.value;
                let mut velocity = self.velocity;
                // Semi-implicit Euler: F = -k (x - target) - c v, unit mass.
                for _ in 0..substeps {
                    let force = -spec.stiffness * (value - target) - damping * velocity;
                    velocity += force * dt;
                    value += velocity * dt;
                }
                let settled = velocity.abs() < spec.velocity_threshold
                    && (value - target).abs() < spec.position_threshold;
                if settled {
                    FrameStep {
                        value: target,
                        velocity: 0.0,
                        settled,
                    }
                } else {
                    FrameStep {
                        value,
                        velocity,
                        settled,
                    }
                }
            }
            Motion::Decay {
                ref spec,
                from,
                initial_velocity,
            } => {
                let play_time = play_time_nanos as i64;
                let duration = spec.get_duration_nanos(from, initial_velocity);
                let play_time = play_time.min(duration);
                let velocity = spec.get_velocity_from_nanos(play_time, from, initial_velocity);
                FrameStep {
                    value: spec.get_value_from_nanos(play_time, from, initial_velocity),
                    velocity,
                    settled: play_time >= duration
                        || velocity.abs() < spec.abs_velocity_threshold(),
                }
            }
        };

        let clamped = self.clamp(step.value);
        if clamped != step.value {
            self.value = clamped;
            self.velocity = 0.0;
            return Some(AnimationEndReason::BoundReached);
        }
        self.value = step.value;
        self.velocity = if step.settled { 0.0 } else { step.velocity };
        step.settled.then_some(AnimationEndReason::Finished)
    }
}

/// Animated `f32` shared through cheap clones.
///
/// Completion callbacks always run with no internal borrow held, so they may
/// start the next animation on the same value.
#[derive(Clone)]
pub struct Animatable {
    inner: Rc<RefCell<AnimatableInner>>,
}

impl Animatable {
    pub fn new(initial: f32, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimatableInner {
                label: "animatable",
                runtime,
                value: initial,
                velocity: 0.0,
                lower_bound: None,
                upper_bound: None,
                motion: Motion::Idle,
                start_time_nanos: None,
                last_frame_nanos: None,
                generation: 0,
                registration: None,
                on_end: None,
            })),
        }
    }

    /// Name used in log output.
    pub fn with_label(self, label: &'static str) -> Self {
        self.inner.borrow_mut().label = label;
        self
    }

    pub fn label(&self) -> &'static str {
        self.inner.borrow().label
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.inner.borrow().motion, Motion::Idle)
    }

    /// Where the running animation is heading, if anywhere.
    pub fn target(&self) -> Option<f32> {
        let inner = self.inner.borrow();
        match &inner.motion {
            Motion::Idle => None,
            Motion::Tween { target, .. } | Motion::Spring { target, .. } => Some(*target),
            Motion::Decay {
                spec,
                from,
                initial_velocity,
            } => Some(inner.clamp(spec.get_target_value(*from, *initial_velocity))),
        }
    }

    /// Constrain animated values. Reaching a bound ends the animation with
    /// [`AnimationEndReason::BoundReached`].
    pub fn update_bounds(&self, lower: Option<f32>, upper: Option<f32>) {
        let mut inner = self.inner.borrow_mut();
        inner.lower_bound = lower;
        inner.upper_bound = upper;
    }

    /// Jump to `value`, interrupting any running animation.
    pub fn snap_to(&self, value: f32) {
        self.interrupt();
        let mut inner = self.inner.borrow_mut();
        inner.value = inner.clamp(value);
        inner.velocity = 0.0;
    }

    /// Interrupt the running animation, keeping the current value.
    pub fn stop(&self) {
        self.interrupt();
    }

    /// Animate towards `target`.
    ///
    /// # Panics
    ///
    /// Panics when `animation` is malformed, e.g. a spring without stiffness.
    pub fn animate_to(
        &self,
        target: f32,
        animation: AnimationType,
        on_end: impl FnOnce(AnimationResult) + 'static,
    ) {
        if let Err(err) = animation.validate() {
            panic!("{}: {err}", self.label());
        }
        self.interrupt();
        {
            let mut inner = self.inner.borrow_mut();
            inner.motion = match animation {
                AnimationType::Tween(spec) => Motion::Tween {
                    spec,
                    from: inner.value,
                    target,
                },
                AnimationType::Spring(spec) => Motion::Spring { spec, target },
            };
            inner.on_end = Some(Box::new(on_end));
            log::debug!("{}: animate {} -> {target}", inner.label, inner.value);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Coast from the current value with `initial_velocity` (units/s).
    ///
    /// # Panics
    ///
    /// Panics when `spec` fails validation.
    pub fn animate_decay(
        &self,
        initial_velocity: f32,
        spec: impl FloatDecayAnimationSpec + 'static,
        on_end: impl FnOnce(AnimationResult) + 'static,
    ) {
        if let Err(err) = spec.validate() {
            panic!("{}: {err}", self.label());
        }
        self.interrupt();
        {
            let mut inner = self.inner.borrow_mut();
            inner.motion = Motion::Decay {
                spec: Box::new(spec),
                from: inner.value,
                initial_velocity,
            };
            inner.velocity = initial_velocity;
            inner.on_end = Some(Box::new(on_end));
            log::debug!(
                "{}: decay from {} with velocity {initial_velocity}",
                inner.label,
                inner.value
            );
        }
        Self::schedule_frame(&self.inner);
    }

    fn interrupt(&self) {
        let (registration, on_end, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            if !matches!(inner.motion, Motion::Idle) {
                log::debug!("{}: interrupted at {}", inner.label, inner.value);
            }
            inner.motion = Motion::Idle;
            inner.start_time_nanos = None;
            inner.last_frame_nanos = None;
            (
                inner.registration.take(),
                inner.on_end.take(),
                inner.value,
            )
        };
        drop(registration);
        if let Some(on_end) = on_end {
            on_end(AnimationResult {
                end_reason: AnimationEndReason::Interrupted,
                end_value: value,
            });
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner>>) {
        let (clock, generation) = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            (inner.runtime.frame_clock(), inner.generation)
        };
        let weak = Rc::downgrade(this);
        let registration = clock.with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, generation, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner>>, generation: u64, frame_time_nanos: u64) {
        let outcome = {
            let mut inner = this.borrow_mut();
            if inner.generation != generation {
                return;
            }
            inner.registration = None;
            let outcome = inner.step(frame_time_nanos);
            log::trace!(
                "{}: frame {frame_time_nanos} value {} velocity {}",
                inner.label,
                inner.value,
                inner.velocity
            );
            outcome
        };

        let Some(end_reason) = outcome else {
            Self::schedule_frame(this);
            return;
        };

        let (on_end, end_value) = {
            let mut inner = this.borrow_mut();
            inner.generation += 1;
            inner.motion = Motion::Idle;
            inner.start_time_nanos = None;
            inner.last_frame_nanos = None;
            log::debug!("{}: {end_reason:?} at {}", inner.label, inner.value);
            (inner.on_end.take(), inner.value)
        };
        if let Some(on_end) = on_end {
            on_end(AnimationResult {
                end_reason,
                end_value,
            });
        }
    }
}

/// Two [`Animatable`]s moved together as a point.
///
/// Completion is reported once both axes have ended. When one axis reaches a
/// bound the other is stopped and the pair reports
/// [`AnimationEndReason::BoundReached`].
#[derive(Clone)]
pub struct AnimatableXY {
    x: Animatable,
    y: Animatable,
}

impl AnimatableXY {
    pub fn new(initial: Point, runtime: RuntimeHandle) -> Self {
        Self {
            x: Animatable::new(initial.x, runtime.clone()),
            y: Animatable::new(initial.y, runtime),
        }
    }

    pub fn with_labels(self, x_label: &'static str, y_label: &'static str) -> Self {
        Self {
            x: self.x.with_label(x_label),
            y: self.y.with_label(y_label),
        }
    }

    pub fn x(&self) -> &Animatable {
        &self.x
    }

    pub fn y(&self) -> &Animatable {
        &self.y
    }

    pub fn value(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }

    pub fn velocity(&self) -> Point {
        Point::new(self.x.velocity(), self.y.velocity())
    }

    pub fn is_running(&self) -> bool {
        self.x.is_running() || self.y.is_running()
    }

    /// Constrain both axes to `bounds`, or lift the constraint with `None`.
    pub fn update_bounds(&self, bounds: Option<Rect>) {
        match bounds {
            Some(rect) => {
                self.x.update_bounds(Some(rect.x), Some(rect.right()));
                self.y.update_bounds(Some(rect.y), Some(rect.bottom()));
            }
            None => {
                self.x.update_bounds(None, None);
                self.y.update_bounds(None, None);
            }
        }
    }

    pub fn snap_to(&self, value: Point) {
        self.x.snap_to(value.x);
        self.y.snap_to(value.y);
    }

    pub fn stop(&self) {
        self.x.stop();
        self.y.stop();
    }

    pub fn animate_to(
        &self,
        target: Point,
        animation: AnimationType,
        on_end: impl FnOnce(AnimationEndReason) + 'static,
    ) {
        let (on_x, on_y) = self.completion(on_end);
        self.x.animate_to(target.x, animation, on_x);
        self.y.animate_to(target.y, animation, on_y);
    }

    /// Coast with `velocity` (units/s per axis) until at rest or out of bounds.
    pub fn animate_decay<S>(
        &self,
        velocity: Point,
        spec: S,
        on_end: impl FnOnce(AnimationEndReason) + 'static,
    ) where
        S: FloatDecayAnimationSpec + Clone + 'static,
    {
        let (on_x, on_y) = self.completion(on_end);
        self.x.animate_decay(velocity.x, spec.clone(), on_x);
        self.y.animate_decay(velocity.y, spec, on_y);
    }

    fn completion(
        &self,
        on_end: impl FnOnce(AnimationEndReason) + 'static,
    ) -> (
        impl FnOnce(AnimationResult) + 'static,
        impl FnOnce(AnimationResult) + 'static,
    ) {
        let group = ParallelGroup::new(2, on_end);
        let axis = |sibling: Animatable| {
            let member = group.member();
            move |result: AnimationResult| {
                if result.end_reason == AnimationEndReason::BoundReached {
                    sibling.stop();
                }
                member(result);
            }
        };
        (axis(self.y.clone()), axis(self.x.clone()))
    }
}

#[cfg(test)]
#[path = "tests/animatable_tests.rs"]
mod tests;
