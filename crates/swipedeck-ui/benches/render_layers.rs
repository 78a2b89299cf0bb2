use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swipedeck_testing::{sample_cards, SwipeTestRule};
use swipedeck_ui::Point;

const DECK_SIZES: &[i64] = &[4, 64, 1024];
const DRAG_FRAMES: usize = 60;

fn bench_render_idle(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_layers_idle");
    for &size in DECK_SIZES {
        let rule = SwipeTestRule::new(sample_cards(size)).expect("valid deck");
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(rule.stack().render_layers()));
        });
    }
    group.finish();
}

fn bench_drag_frame(c: &mut Criterion) {
    c.bench_function("drag_frame", |b| {
        b.iter(|| {
            let mut rule = SwipeTestRule::new(sample_cards(4)).expect("valid deck");
            rule.press(0.0, 0.0);
            for frame in 0..DRAG_FRAMES {
                rule.move_to(frame as f32 * 2.0, 0.0);
                black_box(rule.stack().render_layers());
            }
            rule.release_with_velocity(Point::ZERO);
        });
    });
}

fn bench_dismiss_session(c: &mut Criterion) {
    c.bench_function("dismiss_session", |b| {
        b.iter(|| {
            let mut rule = SwipeTestRule::new(sample_cards(8)).expect("valid deck");
            rule.swipe(200.0, Point::new(4_000.0, 0.0));
            while rule.stack().phase() != swipedeck_ui::SwipePhase::Idle {
                rule.advance_frame();
                black_box(rule.stack().render_layers());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_render_idle,
    bench_drag_frame,
    bench_dismiss_session
);
criterion_main!(benches);
