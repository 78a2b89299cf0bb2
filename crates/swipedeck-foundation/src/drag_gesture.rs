//! Single-pointer drag tracking.
//!
//! Converts Down/Move/Up events into a cumulative offset from the gesture's
//! start and, on release, the pointer velocity.

use swipedeck_graphics::Point;

use crate::gesture_constants::MAX_FLING_VELOCITY;
use crate::{PointerEvent, PointerEventKind, PointerId, VelocityTracker};

/// End of a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragRelease {
    /// Displacement from the pointer-down position.
    pub offset: Point,
    /// Pointer velocity in px/s.
    pub velocity: Point,
    /// The platform cancelled the gesture instead of the pointer lifting.
    pub cancelled: bool,
}

/// What a pointer event did to the drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    Started,
    Moved(Point),
    Released(DragRelease),
}

#[derive(Clone, Debug)]
pub struct DragGestureTracker {
    pointer: Option<PointerId>,
    origin: Point,
    offset: Point,
    velocity: VelocityTracker,
    max_velocity: f32,
}

impl Default for DragGestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DragGestureTracker {
    pub fn new() -> Self {
        Self {
            pointer: None,
            origin: Point::ZERO,
            offset: Point::ZERO,
            velocity: VelocityTracker::new(),
            max_velocity: MAX_FLING_VELOCITY,
        }
    }

    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn is_active(&self) -> bool {
        self.pointer.is_some()
    }

    /// Cumulative displacement of the active gesture, `(0, 0)` when idle.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Feed one event. Events for other pointers are ignored while a gesture
    /// is active, and Move/Up without a gesture are ignored.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        match event.kind {
            PointerEventKind::Down => self.start(event).then_some(DragEvent::Started),
            PointerEventKind::Move => self.update(event).map(DragEvent::Moved),
            PointerEventKind::Up | PointerEventKind::Cancel => {
                self.finish(event).map(DragEvent::Released)
            }
        }
    }

    fn start(&mut self, event: &PointerEvent) -> bool {
        if self.is_active() {
            log::debug!("ignoring pointer {} down during active drag", event.id);
            return false;
        }
        self.pointer = Some(event.id);
        self.origin = event.position;
        self.offset = Point::ZERO;
        self.velocity.reset();
        self.velocity.add_position(event.time_millis, event.position);
        true
    }

    fn update(&mut self, event: &PointerEvent) -> Option<Point> {
        if self.pointer != Some(event.id) {
            return None;
        }
        self.offset = event.position - self.origin;
        self.velocity.add_position(event.time_millis, event.position);
        Some(self.offset)
    }

    fn finish(&mut self, event: &PointerEvent) -> Option<DragRelease> {
        if self.pointer != Some(event.id) {
            return None;
        }
        if event.kind == PointerEventKind::Cancel {
            return self.end(Point::ZERO, true);
        }
        self.offset = event.position - self.origin;
        self.velocity.add_position(event.time_millis, event.position);
        let velocity = self.velocity.calculate_velocity(self.max_velocity);
        self.end(velocity, false)
    }

    /// End the gesture at the current offset with a host-measured velocity.
    pub fn release_with_velocity(&mut self, velocity: Point) -> Option<DragRelease> {
        if !self.is_active() {
            return None;
        }
        self.end(velocity, false)
    }

    /// Abandon the gesture without producing a release.
    pub fn reset(&mut self) {
        self.pointer = None;
        self.offset = Point::ZERO;
        self.velocity.reset();
    }

    fn end(&mut self, velocity: Point, cancelled: bool) -> Option<DragRelease> {
        let release = DragRelease {
            offset: self.offset,
            velocity,
            cancelled,
        };
        self.reset();
        Some(release)
    }
}
