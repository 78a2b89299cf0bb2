//! The swipe card stack.
//!
//! `SwipeStack` owns the deck and the animated values of the head card. The
//! host forwards pointer events through [`SwipeStack::on_pointer_event`] and
//! drives frames through the runtime; the stack answers with a render list.
//!
//! Phases:
//!
//! ```text
//! Idle -> Dragging -> SnappingBack -> Idle
//!                  -> Dismissing -> Advancing -> Idle
//! ```
//!
//! A pointer-down during `SnappingBack` takes the card back mid-spring.
//! Pointer-downs during `Dismissing` and `Advancing` are ignored.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;
use swipedeck_animation::{
    Animatable, AnimatableXY, AnimationEndReason, AnimationSpec, AnimationType,
    ExponentialDecaySpec, Interpolation, ParallelGroup, SpringSpec,
};
use swipedeck_core::RuntimeHandle;
use swipedeck_foundation::gesture_constants::PRIMARY_POINTER;
use swipedeck_foundation::{
    DragEvent, DragGestureTracker, DragRelease, PointerEvent, PointerEventKind,
};
use swipedeck_graphics::{Degrees, Point, Rect};

use crate::renderer::{self, RenderList};
use crate::{
    CardId, CardQueue, CardRecord, SwipeDecision, SwipeDirection, SwipeError, SwipePolicy,
    SwipeStackConfig,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipePhase {
    Idle,
    Dragging,
    /// The head card coasts away; the queue is untouched until it stops.
    Dismissing,
    /// The dismissed card fades out while the new head grows to full size.
    Advancing,
    SnappingBack,
}

impl SwipePhase {
    /// Whether a pointer-down on the head card starts a drag.
    pub fn accepts_pointer_down(self) -> bool {
        matches!(self, SwipePhase::Idle | SwipePhase::SnappingBack)
    }

    /// Whether the head card is the gesture target.
    pub fn head_interactive(self) -> bool {
        matches!(
            self,
            SwipePhase::Idle | SwipePhase::Dragging | SwipePhase::SnappingBack
        )
    }
}

/// A card that left the deck.
#[derive(Clone, Debug, PartialEq)]
pub struct DismissedCard {
    pub card: Rc<CardRecord>,
    pub direction: SwipeDirection,
}

/// Animated values of the top two cards for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationState {
    pub offset: Point,
    pub rotation: Degrees,
    pub content_opacity: f32,
    pub opacity: f32,
    pub back_scale: f32,
}

type DismissListener = Box<dyn FnMut(&DismissedCard)>;

struct DeckState {
    queue: CardQueue,
    phase: SwipePhase,
    /// Previous head while it fades out during `Advancing`.
    leaving: Option<Rc<CardRecord>>,
    dismissed: Vec<DismissedCard>,
    on_dismiss: Option<DismissListener>,
}

/// Deck and animated values, cloned into completion callbacks.
#[derive(Clone)]
struct Animator {
    deck: Rc<RefCell<DeckState>>,
    offset: AnimatableXY,
    opacity: Animatable,
    back_scale: Animatable,
    spring: SpringSpec,
    decay: ExponentialDecaySpec,
    fade: AnimationSpec,
    back_card_scale: f32,
    dismiss_bounds: Rect,
}

impl Animator {
    fn phase(&self) -> SwipePhase {
        self.deck.borrow().phase
    }

    fn set_phase(&self, phase: SwipePhase) {
        let mut deck = self.deck.borrow_mut();
        if deck.phase != phase {
            log::debug!("swipe phase {:?} -> {phase:?}", deck.phase);
            deck.phase = phase;
        }
    }

    fn snap_back(&self) {
        self.set_phase(SwipePhase::SnappingBack);
        let animator = self.clone();
        self.offset.animate_to(
            Point::ZERO,
            AnimationType::Spring(self.spring),
            move |reason| {
                // Interrupted means a new drag took the card.
                if reason != AnimationEndReason::Interrupted
                    && animator.phase() == SwipePhase::SnappingBack
                {
                    animator.set_phase(SwipePhase::Idle);
                }
            },
        );
    }

    fn dismiss(&self, direction: SwipeDirection, velocity: Point) {
        self.set_phase(SwipePhase::Dismissing);
        self.offset.update_bounds(Some(self.dismiss_bounds));
        let animator = self.clone();
        self.offset
            .animate_decay(velocity, self.decay, move |reason| match reason {
                AnimationEndReason::Interrupted => {
                    log::debug!("dismiss trajectory interrupted");
                }
                // Coming to rest inside the bounds still dismisses.
                AnimationEndReason::Finished | AnimationEndReason::BoundReached => {
                    animator.advance(direction);
                }
            });
    }

    fn advance(&self, direction: SwipeDirection) {
        let dismissed = {
            let mut deck = self.deck.borrow_mut();
            deck.queue.remove_head().map(|card| {
                deck.leaving = Some(Rc::clone(&card));
                let dismissed = DismissedCard { card, direction };
                deck.dismissed.push(dismissed.clone());
                dismissed
            })
        };
        let Some(dismissed) = dismissed else {
            log::warn!("dismiss finished without a head card");
            self.reset();
            return;
        };
        log::info!(
            "dismissed card {} to the {:?}",
            dismissed.card.id(),
            dismissed.direction
        );
        self.set_phase(SwipePhase::Advancing);
        self.notify(&dismissed);

        let animator = self.clone();
        let group = ParallelGroup::new(2, move |reason| {
            if reason != AnimationEndReason::Interrupted {
                animator.reset();
            }
        });
        self.back_scale
            .animate_to(1.0, AnimationType::Spring(self.spring), group.member());
        self.opacity
            .animate_to(0.0, AnimationType::Tween(self.fade), group.member());
    }

    fn notify(&self, dismissed: &DismissedCard) {
        let listener = self.deck.borrow_mut().on_dismiss.take();
        if let Some(mut listener) = listener {
            listener(dismissed);
            let mut deck = self.deck.borrow_mut();
            if deck.on_dismiss.is_none() {
                deck.on_dismiss = Some(listener);
            }
        }
    }

    fn reset(&self) {
        self.offset.update_bounds(None);
        self.offset.snap_to(Point::ZERO);
        self.opacity.snap_to(1.0);
        self.back_scale.snap_to(self.back_card_scale);
        self.deck.borrow_mut().leaving = None;
        self.set_phase(SwipePhase::Idle);
    }

    fn stop(&self) {
        self.offset.stop();
        self.opacity.stop();
        self.back_scale.stop();
    }

    fn is_running(&self) -> bool {
        self.offset.is_running() || self.opacity.is_running() || self.back_scale.is_running()
    }
}

pub struct SwipeStack {
    runtime: RuntimeHandle,
    config: SwipeStackConfig,
    policy: SwipePolicy,
    rotation: Interpolation,
    content_opacity: Interpolation,
    tracker: DragGestureTracker,
    /// Card offset when the current drag started.
    drag_origin: Point,
    animator: Animator,
}

impl SwipeStack {
    pub fn new(
        cards: impl IntoIterator<Item = CardRecord>,
        runtime: RuntimeHandle,
    ) -> Result<Self, SwipeError> {
        Self::with_config(cards, SwipeStackConfig::default(), runtime)
    }

    pub fn with_config(
        cards: impl IntoIterator<Item = CardRecord>,
        config: SwipeStackConfig,
        runtime: RuntimeHandle,
    ) -> Result<Self, SwipeError> {
        config.validate()?;
        let queue = CardQueue::new(cards)?;
        log::debug!("swipe stack mounted with {} cards", queue.len());

        let animator = Animator {
            deck: Rc::new(RefCell::new(DeckState {
                queue,
                phase: SwipePhase::Idle,
                leaving: None,
                dismissed: Vec::new(),
                on_dismiss: None,
            })),
            offset: AnimatableXY::new(Point::ZERO, runtime.clone())
                .with_labels("card_offset_x", "card_offset_y"),
            opacity: Animatable::new(1.0, runtime.clone()).with_label("card_opacity"),
            back_scale: Animatable::new(config.back_card_scale, runtime.clone())
                .with_label("back_card_scale"),
            spring: config.spring_spec(),
            decay: config.decay_spec(),
            fade: config.fade_spec(),
            back_card_scale: config.back_card_scale,
            dismiss_bounds: config.dismiss_rect(),
        };

        Ok(Self {
            runtime,
            policy: config.policy(),
            rotation: config.rotation_interpolation()?,
            content_opacity: config.content_opacity_interpolation()?,
            config,
            tracker: DragGestureTracker::new(),
            drag_origin: Point::ZERO,
            animator,
        })
    }

    pub fn config(&self) -> &SwipeStackConfig {
        &self.config
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn phase(&self) -> SwipePhase {
        self.animator.phase()
    }

    /// Idle with no animation in flight.
    pub fn is_settled(&self) -> bool {
        self.phase() == SwipePhase::Idle && !self.animator.is_running()
    }

    pub fn head(&self) -> Option<Rc<CardRecord>> {
        self.animator.deck.borrow().queue.head().cloned()
    }

    /// The card fading out after a dismissal, if any.
    pub fn leaving(&self) -> Option<Rc<CardRecord>> {
        self.animator.deck.borrow().leaving.clone()
    }

    /// Queue entries that get painted, head first.
    pub fn visible(&self) -> SmallVec<[Rc<CardRecord>; 2]> {
        self.animator
            .deck
            .borrow()
            .queue
            .visible(self.config.visible_cards)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.animator.deck.borrow().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animator.deck.borrow().queue.is_empty()
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.animator.deck.borrow().queue.ids()
    }

    /// Append a card behind the current tail.
    pub fn push_card(&mut self, card: CardRecord) -> Result<(), SwipeError> {
        self.animator.deck.borrow_mut().queue.push(card)
    }

    /// Cards dismissed so far, oldest first.
    pub fn dismissed(&self) -> Vec<DismissedCard> {
        self.animator.deck.borrow().dismissed.clone()
    }

    /// Called once per dismissed card, when it leaves the queue.
    pub fn set_on_dismiss(&mut self, listener: impl FnMut(&DismissedCard) + 'static) {
        self.animator.deck.borrow_mut().on_dismiss = Some(Box::new(listener));
    }

    /// Current drag displacement of the head card.
    pub fn gesture_offset(&self) -> Point {
        self.animator.offset.value()
    }

    pub fn animation_state(&self) -> AnimationState {
        let offset = self.animator.offset.value();
        AnimationState {
            offset,
            rotation: Degrees(self.rotation.apply(offset.x)),
            content_opacity: self.content_opacity.apply(offset.x),
            opacity: self.animator.opacity.value(),
            back_scale: self.animator.back_scale.value(),
        }
    }

    pub fn render_layers(&self) -> RenderList {
        renderer::render_layers(self)
    }

    /// Feed one pointer event. Returns whether the stack consumed it.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> bool {
        if event.kind == PointerEventKind::Down {
            return self.pointer_down(event);
        }
        match self.tracker.handle(event) {
            Some(DragEvent::Moved(delta)) => {
                self.animator.offset.snap_to(self.drag_origin + delta);
                true
            }
            Some(DragEvent::Released(release)) => {
                self.release(release);
                true
            }
            Some(DragEvent::Started) | None => false,
        }
    }

    /// End the active drag with a velocity (px/s) measured by the host.
    pub fn release_with_velocity(&mut self, velocity: Point) -> bool {
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            log::warn!("non-finite release velocity {velocity:?}, using zero");
            Point::ZERO
        };
        match self.tracker.release_with_velocity(velocity) {
            Some(release) => {
                self.release(release);
                true
            }
            None => false,
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if event.id != PRIMARY_POINTER || self.tracker.is_active() {
            return false;
        }
        let phase = self.phase();
        if !phase.accepts_pointer_down() {
            log::debug!("ignoring pointer down while {phase:?}");
            return false;
        }
        if self.head().is_none() {
            return false;
        }
        let offset = self.animator.offset.value();
        if let Some(bounds) = self.config.card_bounds {
            // Rotation is ignored for hit testing.
            let card = bounds.translate(offset.x, offset.y);
            if !card.contains(event.position.x, event.position.y) {
                return false;
            }
        }
        if self.tracker.handle(event) != Some(DragEvent::Started) {
            return false;
        }
        self.animator.offset.stop();
        self.drag_origin = offset;
        self.animator.set_phase(SwipePhase::Dragging);
        true
    }

    fn release(&mut self, release: DragRelease) {
        let offset = self.drag_origin + release.offset;
        self.drag_origin = Point::ZERO;
        self.animator.offset.snap_to(offset);
        match self.policy.classify(offset.x) {
            SwipeDecision::SnapBack => {
                log::debug!("release at {offset:?} snaps back");
                self.animator.snap_back();
            }
            SwipeDecision::Dismiss(direction) => {
                log::debug!(
                    "release at {offset:?} with velocity {:?} dismisses {direction:?}",
                    release.velocity
                );
                self.animator.dismiss(direction, release.velocity);
            }
        }
    }
}

impl Drop for SwipeStack {
    fn drop(&mut self) {
        self.animator.stop();
    }
}

#[cfg(test)]
#[path = "tests/swipe_stack_tests.rs"]
mod tests;
