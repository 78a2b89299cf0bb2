//! Release-velocity estimation for drag gestures.
//!
//! Impulse strategy: the velocity is derived from the kinetic energy the
//! recent pointer samples impart, which is robust against jittery last
//! samples.

use swipedeck_graphics::Point;

/// Ring buffer size.
const HISTORY_SIZE: usize = 20;

/// Only samples this recent take part in the estimate.
const HORIZON_MS: i64 = 100;

/// A gap this long between samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// Single-axis velocity tracker over absolute positions.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            newest: 0,
        }
    }

    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample { time_ms, position });
    }

    /// Velocity in units per second; 0 with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.newest] else {
            return 0.0;
        };

        // Walk backwards from the newest sample; times are relative (<= 0).
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.newest;
        let mut previous_time = newest.time_ms;
        while let Some(sample) = self.samples[index] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (previous_time - sample.time_ms).abs();
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            positions[count] = sample.position;
            times[count] = -(age as f32);
            previous_time = sample.time_ms;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&positions[..count], &times[..count]) * 1000.0
    }

    /// Velocity clamped to `±max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.calculate_velocity();
        if !velocity.is_finite() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }
}

/// Samples are ordered newest first; the result is in units per millisecond.
fn impulse_velocity(positions: &[f32], times: &[f32]) -> f32 {
    let oldest = positions.len() - 1;
    let mut work = 0.0f32;
    for i in (1..=oldest).rev() {
        let (earlier, later) = (times[i], times[i - 1]);
        if earlier == later {
            continue;
        }
        let segment_velocity = (positions[i - 1] - positions[i]) / (later - earlier);
        let previous_velocity = kinetic_energy_to_velocity(work);
        work += (segment_velocity - previous_velocity) * segment_velocity.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    kinetic_energy_to_velocity(work)
}

/// `E = ½ m v²` with unit mass.
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

/// Two-axis tracker fed with pointer positions.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, time_ms: i64, position: Point) {
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    /// Per-axis velocity in px/s, each axis clamped to `±max_velocity`.
    pub fn calculate_velocity(&self, max_velocity: f32) -> Point {
        Point::new(
            self.x.calculate_velocity_with_max(max_velocity),
            self.y.calculate_velocity_with_max(max_velocity),
        )
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_sample_give_zero() {
        let mut tracker = VelocityTracker1D::new();
        assert_eq!(tracker.calculate_velocity(), 0.0);
        tracker.add_data_point(0, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn constant_motion() {
        let mut tracker = VelocityTracker1D::new();
        // 100 px every 10 ms = 10_000 px/s.
        for step in 0..4 {
            tracker.add_data_point(step * 10, step as f32 * 100.0);
        }
        let velocity = tracker.calculate_velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn backwards_motion_is_negative() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 300.0);
        tracker.add_data_point(10, 200.0);
        tracker.add_data_point(20, 100.0);
        assert!(tracker.calculate_velocity() < 0.0);
    }

    #[test]
    fn velocity_is_capped() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(1, 10_000.0);
        assert_eq!(tracker.calculate_velocity_with_max(8_000.0), 8_000.0);
        assert_eq!(tracker.calculate_velocity_with_max(-1.0), 0.0);
    }

    #[test]
    fn pause_before_release_gives_zero() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 0.0);
        tracker.add_data_point(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(tracker.calculate_velocity(), 0.0);
    }

    #[test]
    fn stale_samples_are_ignored() {
        let mut tracker = VelocityTracker1D::new();
        tracker.add_data_point(0, 5_000.0);
        tracker.add_data_point(150, 100.0);
        tracker.add_data_point(160, 200.0);
        tracker.add_data_point(170, 300.0);
        let velocity = tracker.calculate_velocity();
        assert!(velocity > 0.0, "got {velocity}");
    }

    #[test]
    fn reset_clears_history() {
        let mut tracker = VelocityTracker::new();
        tracker.add_position(0, Point::new(0.0, 0.0));
        tracker.add_position(10, Point::new(50.0, -20.0));
        let velocity = tracker.calculate_velocity(8_000.0);
        assert!(velocity.x > 0.0 && velocity.y < 0.0);

        tracker.reset();
        assert_eq!(tracker.calculate_velocity(8_000.0), Point::ZERO);
    }
}
