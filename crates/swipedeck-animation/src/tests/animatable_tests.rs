use super::*;

use crate::{AnimationSpec, Easing, ExponentialDecaySpec};
use std::cell::{Cell, RefCell};
use swipedeck_core::{Runtime, RuntimeHandle, FRAME_INTERVAL_NANOS};

/// Drain frames until nothing is scheduled; returns the number of frames run.
fn run_frames(runtime: &RuntimeHandle, frame_time: &mut u64, limit: usize) -> usize {
    let mut frames = 0;
    while runtime.has_frame_callbacks() {
        assert!(frames < limit, "animation did not settle in {limit} frames");
        *frame_time += FRAME_INTERVAL_NANOS;
        runtime.drain_frame_callbacks(*frame_time);
        frames += 1;
    }
    frames
}

fn capture() -> (
    Rc<RefCell<Option<AnimationResult>>>,
    impl FnOnce(AnimationResult) + 'static,
) {
    let slot = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&slot);
    (slot, move |result| {
        sink.borrow_mut().replace(result);
    })
}

#[test]
fn linear_tween_reaches_target_with_midpoints() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(1.0, handle.clone()).with_label("opacity");
    let (result, on_end) = capture();

    value.animate_to(0.0, AnimationType::Tween(AnimationSpec::linear(100)), on_end);
    assert!(value.is_running());
    assert_eq!(value.target(), Some(0.0));

    let mut frame_time = 0;
    let mut samples = Vec::new();
    while handle.has_frame_callbacks() {
        frame_time += FRAME_INTERVAL_NANOS;
        handle.drain_frame_callbacks(frame_time);
        samples.push(value.value());
        assert!(samples.len() < 20);
    }

    assert!(samples.iter().any(|v| *v > 0.0 && *v < 1.0));
    assert!(samples.windows(2).all(|pair| pair[1] <= pair[0]));
    assert_eq!(value.value(), 0.0);
    assert!(!value.is_running());
    let result = result.borrow().expect("completion delivered");
    assert_eq!(result.end_reason, AnimationEndReason::Finished);
    assert_eq!(result.end_value, 0.0);
}

#[test]
fn tween_delay_holds_start_value() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    let spec = AnimationSpec::tween(50, Easing::EaseInOut).with_delay(100);

    value.animate_to(10.0, AnimationType::Tween(spec), |_| {});
    let mut frame_time = 0;
    for _ in 0..4 {
        frame_time += FRAME_INTERVAL_NANOS;
        handle.drain_frame_callbacks(frame_time);
        assert_eq!(value.value(), 0.0);
    }
    run_frames(&handle, &mut frame_time, 30);
    assert_eq!(value.value(), 10.0);
}

#[test]
fn bouncy_spring_overshoots_then_settles() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.9, handle.clone()).with_label("scale");
    let (result, on_end) = capture();

    value.animate_to(
        1.0,
        AnimationType::Spring(SpringSpec::from_friction_tension(4.0, 40.0)),
        on_end,
    );

    let mut frame_time = 0;
    let mut max_seen = 0.9f32;
    while handle.has_frame_callbacks() {
        frame_time += FRAME_INTERVAL_NANOS;
        handle.drain_frame_callbacks(frame_time);
        max_seen = max_seen.max(value.value());
        assert!(frame_time < 10_000_000_000, "spring never settled");
    }

    assert!(max_seen > 1.0, "friction 4 should overshoot, max {max_seen}");
    assert_eq!(value.value(), 1.0);
    assert_eq!(value.velocity(), 0.0);
    assert_eq!(
        result.borrow().expect("completion delivered").end_reason,
        AnimationEndReason::Finished
    );
}

#[test]
fn spring_already_at_rest_finishes_on_first_frame() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    let (result, on_end) = capture();

    value.animate_to(0.0, AnimationType::Spring(SpringSpec::default()), on_end);
    let mut frame_time = 0;
    assert_eq!(run_frames(&handle, &mut frame_time, 2), 1);
    assert!(result.borrow().is_some());
}

#[test]
#[should_panic(expected = "stiffness")]
fn malformed_spring_panics() {
    let runtime = Runtime::new();
    let value = Animatable::new(0.0, runtime.handle());
    value.animate_to(
        1.0,
        AnimationType::Spring(SpringSpec::new(0.5, 0.0)),
        |_| {},
    );
}

#[test]
#[should_panic(expected = "duration_millis")]
fn overflowing_tween_duration_panics() {
    let runtime = Runtime::new();
    let value = Animatable::new(1.0, runtime.handle());
    value.animate_to(
        0.0,
        AnimationType::Tween(AnimationSpec::linear(u64::MAX)),
        |_| {},
    );
}

#[test]
fn spring_survives_a_very_long_frame_gap() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(100.0, handle.clone());
    let (result, on_end) = capture();

    value.animate_to(
        0.0,
        AnimationType::Spring(SpringSpec::from_friction_tension(4.0, 40.0)),
        on_end,
    );
    let mut frame_time = FRAME_INTERVAL_NANOS;
    handle.drain_frame_callbacks(frame_time);

    // Host resumes after a long suspend.
    frame_time = 2_000_000 * 1_000_000_000;
    handle.drain_frame_callbacks(frame_time);
    assert!(value.value().is_finite());
    assert!(value.value().abs() < 100.0);

    run_frames(&handle, &mut frame_time, 200);
    assert_eq!(value.value(), 0.0);
    let result = result.borrow().expect("completion delivered");
    assert_eq!(result.end_reason, AnimationEndReason::Finished);
}

#[test]
#[should_panic(expected = "deceleration")]
fn malformed_decay_panics() {
    let runtime = Runtime::new();
    let value = Animatable::new(0.0, runtime.handle());
    value.animate_decay(100.0, ExponentialDecaySpec::new(1.5), |_| {});
}

#[test]
fn decay_coasts_in_release_direction_and_stops() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(150.0, handle.clone());
    let (result, on_end) = capture();

    value.animate_decay(5000.0, ExponentialDecaySpec::new(0.98), on_end);
    let predicted = value.target().expect("decay has a resting target");

    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 200);

    assert!(value.value() > 390.0 && value.value() <= 400.0);
    assert!((value.value() - predicted).abs() < 1.0);
    assert_eq!(
        result.borrow().expect("completion delivered").end_reason,
        AnimationEndReason::Finished
    );
}

#[test]
fn decay_hitting_bound_is_clamped() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    value.update_bounds(Some(-100.0), Some(100.0));
    let (result, on_end) = capture();

    value.animate_decay(-5000.0, ExponentialDecaySpec::new(0.98), on_end);
    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 200);

    assert_eq!(value.value(), -100.0);
    let result = result.borrow().expect("completion delivered");
    assert_eq!(result.end_reason, AnimationEndReason::BoundReached);
    assert!(!result.finished());
}

#[test]
fn new_animation_interrupts_previous_one() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    let (first, first_end) = capture();
    let (second, second_end) = capture();

    value.animate_to(100.0, AnimationType::Tween(AnimationSpec::linear(1000)), first_end);
    let mut frame_time = 0;
    for _ in 0..3 {
        frame_time += FRAME_INTERVAL_NANOS;
        handle.drain_frame_callbacks(frame_time);
    }
    let midway = value.value();
    assert!(midway > 0.0);

    value.animate_to(0.0, AnimationType::Tween(AnimationSpec::linear(50)), second_end);
    let first_result = first.borrow().expect("first animation reported");
    assert_eq!(first_result.end_reason, AnimationEndReason::Interrupted);
    assert!(!first_result.finished());
    assert_eq!(first_result.end_value, midway);

    run_frames(&handle, &mut frame_time, 20);
    assert_eq!(value.value(), 0.0);
    assert_eq!(
        second.borrow().expect("second animation reported").end_reason,
        AnimationEndReason::Finished
    );
}

#[test]
fn snap_to_interrupts_and_sets_value() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    let (result, on_end) = capture();

    value.animate_to(1.0, AnimationType::Spring(SpringSpec::default()), on_end);
    value.snap_to(0.5);

    assert_eq!(value.value(), 0.5);
    assert!(!value.is_running());
    assert_eq!(
        result.borrow().expect("interrupt reported").end_reason,
        AnimationEndReason::Interrupted
    );
    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 2);
    assert_eq!(value.value(), 0.5);
}

#[test]
fn completion_can_chain_next_animation() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let value = Animatable::new(0.0, handle.clone());
    let chained = Rc::new(Cell::new(false));

    let next = value.clone();
    let flag = Rc::clone(&chained);
    value.animate_to(
        1.0,
        AnimationType::Tween(AnimationSpec::linear(32)),
        move |_| {
            next.animate_to(
                2.0,
                AnimationType::Tween(AnimationSpec::linear(32)),
                move |_| flag.set(true),
            );
        },
    );

    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 20);
    assert_eq!(value.value(), 2.0);
    assert!(chained.get());
}

#[test]
fn xy_spring_returns_to_origin_once() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let offset = AnimatableXY::new(Point::new(50.0, -20.0), handle.clone());
    let reports = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&reports);
    offset.animate_to(
        Point::ZERO,
        AnimationType::Spring(SpringSpec::from_friction_tension(4.0, 40.0)),
        move |reason| sink.borrow_mut().push(reason),
    );
    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 1000);

    assert_eq!(offset.value(), Point::ZERO);
    assert_eq!(reports.borrow().as_slice(), &[AnimationEndReason::Finished]);
}

#[test]
fn xy_decay_stops_sibling_when_one_axis_leaves_bounds() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let offset = AnimatableXY::new(Point::new(150.0, 0.0), handle.clone());
    offset.update_bounds(Some(Rect::from_center_half_extent(
        Point::ZERO,
        swipedeck_graphics::Size::new(200.0, 200.0),
    )));
    let reports = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&reports);
    offset.animate_decay(
        Point::new(5000.0, 1000.0),
        ExponentialDecaySpec::new(0.98),
        move |reason| sink.borrow_mut().push(reason),
    );
    let mut frame_time = 0;
    run_frames(&handle, &mut frame_time, 200);

    assert_eq!(offset.x().value(), 200.0);
    // The y axis is stopped by the x bound before it moves far.
    assert!(offset.y().value() >= 0.0 && offset.y().value() < 200.0);
    assert!(!offset.is_running());
    assert_eq!(
        reports.borrow().as_slice(),
        &[AnimationEndReason::BoundReached]
    );
}

#[test]
fn xy_stop_reports_interrupted() {
    let runtime = Runtime::new();
    let handle = runtime.handle();
    let offset = AnimatableXY::new(Point::new(80.0, 10.0), handle.clone());
    let reports = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&reports);
    offset.animate_to(
        Point::ZERO,
        AnimationType::Spring(SpringSpec::default()),
        move |reason| sink.borrow_mut().push(reason),
    );
    handle.drain_frame_callbacks(FRAME_INTERVAL_NANOS);
    handle.drain_frame_callbacks(2 * FRAME_INTERVAL_NANOS);
    offset.stop();

    assert!(!offset.is_running());
    assert_eq!(
        reports.borrow().as_slice(),
        &[AnimationEndReason::Interrupted]
    );
}
