use swipedeck_core::{Runtime, RuntimeHandle, FRAME_INTERVAL_NANOS};
use swipedeck_foundation::PointerEvent;
use swipedeck_graphics::Point;
use swipedeck_ui::{CardId, CardRecord, SwipeError, SwipeStack, SwipeStackConfig};

/// Frames `pump_until_idle` runs before assuming an animation never ends.
const MAX_IDLE_FRAMES: usize = 10_000;

/// Headless harness for exercising a [`SwipeStack`] in tests.
///
/// `SwipeTestRule` owns the runtime the stack animates on and a virtual
/// clock. Frames advance in fixed ~60 fps steps and pointer events are
/// stamped with the same clock, so a drag of one move per frame produces
/// realistic release velocities.
pub struct SwipeTestRule {
    stack: SwipeStack,
    runtime: Runtime,
    frame_time_nanos: u64,
    pointer: Point,
}

impl SwipeTestRule {
    /// Mount a stack with the default configuration.
    pub fn new(cards: impl IntoIterator<Item = CardRecord>) -> Result<Self, SwipeError> {
        Self::with_config(cards, SwipeStackConfig::default())
    }

    pub fn with_config(
        cards: impl IntoIterator<Item = CardRecord>,
        config: SwipeStackConfig,
    ) -> Result<Self, SwipeError> {
        let runtime = Runtime::new();
        let stack = SwipeStack::with_config(cards, config, runtime.handle())?;
        Ok(Self {
            stack,
            runtime,
            frame_time_nanos: 0,
            pointer: Point::ZERO,
        })
    }

    pub fn stack(&self) -> &SwipeStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut SwipeStack {
        &mut self.stack
    }

    /// Access the runtime driving this rule.
    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    /// Advance the clock by one frame and run the scheduled callbacks.
    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_INTERVAL_NANOS;
        self.runtime
            .handle()
            .drain_frame_callbacks(self.frame_time_nanos);
    }

    pub fn pump_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_frame();
        }
    }

    /// Advance frames until no frame callback is scheduled. Returns the
    /// number of frames run.
    pub fn pump_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.runtime.handle().has_frame_callbacks() {
            if frames >= MAX_IDLE_FRAMES {
                panic!("pump_until_idle: still animating after {MAX_IDLE_FRAMES} frames");
            }
            self.advance_frame();
            frames += 1;
        }
        log::trace!("pump_until_idle: settled after {frames} frame(s)");
        frames
    }

    /// Put the primary pointer down at `(x, y)`.
    pub fn press(&mut self, x: f32, y: f32) -> bool {
        self.pointer = Point::new(x, y);
        let event = PointerEvent::down(self.pointer, self.pointer_time());
        self.stack.on_pointer_event(&event)
    }

    /// Advance one frame, then move the pointer to `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        self.advance_frame();
        self.pointer = Point::new(x, y);
        let event = PointerEvent::moved(self.pointer, self.pointer_time());
        self.stack.on_pointer_event(&event)
    }

    /// Advance one frame, then lift the pointer where it is.
    pub fn release(&mut self) -> bool {
        self.advance_frame();
        let event = PointerEvent::up(self.pointer, self.pointer_time());
        self.stack.on_pointer_event(&event)
    }

    /// End the drag with a known velocity in px/s.
    pub fn release_with_velocity(&mut self, velocity: Point) -> bool {
        self.stack.release_with_velocity(velocity)
    }

    /// Press at the last pointer position and move by `(dx, dy)` over
    /// `steps` frames. The pointer stays down.
    pub fn drag_by(&mut self, dx: f32, dy: f32, steps: usize) -> bool {
        let start = self.pointer;
        if !self.press(start.x, start.y) {
            return false;
        }
        let steps = steps.max(1);
        for step in 1..=steps {
            let fraction = step as f32 / steps as f32;
            self.move_to(start.x + dx * fraction, start.y + dy * fraction);
        }
        true
    }

    /// Drag horizontally by `dx` and let go with `velocity`.
    pub fn swipe(&mut self, dx: f32, velocity: Point) -> bool {
        self.drag_by(dx, 0.0, 4) && self.release_with_velocity(velocity)
    }

    /// Queue order, head first.
    pub fn card_ids(&self) -> Vec<CardId> {
        self.stack.card_ids()
    }

    /// Rendered cards in paint order, top-most last.
    pub fn render_ids(&self) -> Vec<CardId> {
        self.stack
            .render_layers()
            .iter()
            .map(|layer| layer.card.id())
            .collect()
    }

    fn pointer_time(&self) -> i64 {
        (self.frame_time_nanos / 1_000_000) as i64
    }
}

/// `count` cards with ids `1..=count`.
pub fn sample_cards(count: CardId) -> Vec<CardRecord> {
    (1..=count)
        .map(|id| CardRecord::new(id, format!("https://cards.test/{id}.jpg"), format!("Card {id}")))
        .collect()
}

/// Convenience helper for tests that only need temporary access to a
/// `SwipeTestRule`.
pub fn run_swipe_test<R>(
    cards: impl IntoIterator<Item = CardRecord>,
    f: impl FnOnce(&mut SwipeTestRule) -> R,
) -> Result<R, SwipeError> {
    let mut rule = SwipeTestRule::new(cards)?;
    Ok(f(&mut rule))
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
