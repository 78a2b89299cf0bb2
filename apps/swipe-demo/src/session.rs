//! Scripted swipe session on a headless runtime.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Serialize;
use swipedeck_core::{Runtime, FRAME_INTERVAL_NANOS};
use swipedeck_ui::{
    CardId, CardLayer, CardTransform, Point, PointerEvent, SwipeDirection, SwipeStack,
};

use crate::deck::DeckFile;

/// Frames one swipe may take to settle before the session gives up.
const MAX_SETTLE_FRAMES: usize = 2_000;
const DRAG_STEPS: usize = 4;

/// One horizontal swipe: drag by `dx`, release with `velocity_x` (px/s).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeStep {
    pub dx: f32,
    pub velocity_x: f32,
}

impl SwipeStep {
    pub fn default_script() -> Vec<SwipeStep> {
        vec![
            SwipeStep {
                dx: 150.0,
                velocity_x: 5_000.0,
            },
            SwipeStep {
                dx: 50.0,
                velocity_x: 0.0,
            },
            SwipeStep {
                dx: -200.0,
                velocity_x: -4_000.0,
            },
        ]
    }
}

/// `DX` or `DX@VX`.
impl FromStr for SwipeStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dx, velocity_x) = match s.split_once('@') {
            Some((dx, velocity)) => (dx, Some(velocity)),
            None => (s, None),
        };
        let dx: f32 = dx
            .trim()
            .parse()
            .map_err(|err| format!("bad swipe distance `{dx}`: {err}"))?;
        let velocity_x: f32 = match velocity_x {
            Some(velocity) => velocity
                .trim()
                .parse()
                .map_err(|err| format!("bad release velocity `{velocity}`: {err}"))?,
            None => 0.0,
        };
        if !dx.is_finite() || !velocity_x.is_finite() {
            return Err(format!("swipe `{s}` must be finite"));
        }
        Ok(SwipeStep { dx, velocity_x })
    }
}

#[derive(Debug, Serialize)]
pub struct DismissedEntry {
    pub id: CardId,
    pub caption: String,
    pub direction: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub frames: usize,
    pub dismissed: Vec<DismissedEntry>,
    pub remaining: Vec<CardId>,
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames played: {}", self.frames)?;
        for entry in &self.dismissed {
            writeln!(
                f,
                "dismissed #{} {} ({})",
                entry.id, entry.caption, entry.direction
            )?;
        }
        write!(f, "remaining: {:?}", self.remaining)
    }
}

struct Session {
    stack: SwipeStack,
    runtime: Runtime,
    frame_time_nanos: u64,
    frames: usize,
    log_every: usize,
}

impl Session {
    fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_INTERVAL_NANOS;
        self.runtime
            .handle()
            .drain_frame_callbacks(self.frame_time_nanos);
        self.frames += 1;
        if self.log_every > 0 && self.frames % self.log_every == 0 {
            log::info!(
                "frame {:>4} {:?}: {}",
                self.frames,
                self.stack.phase(),
                describe(&self.stack.render_layers())
            );
        }
    }

    fn pointer_time(&self) -> i64 {
        (self.frame_time_nanos / 1_000_000) as i64
    }

    fn play(&mut self, step: SwipeStep) -> Result<()> {
        if !self
            .stack
            .on_pointer_event(&PointerEvent::down(Point::ZERO, self.pointer_time()))
        {
            log::warn!("swipe {step:?} skipped: no card to grab");
            return Ok(());
        }
        for index in 1..=DRAG_STEPS {
            self.advance_frame();
            let x = step.dx * index as f32 / DRAG_STEPS as f32;
            let event = PointerEvent::moved(Point::new(x, 0.0), self.pointer_time());
            self.stack.on_pointer_event(&event);
        }
        self.stack
            .release_with_velocity(Point::new(step.velocity_x, 0.0));
        log::info!("released {step:?} -> {:?}", self.stack.phase());

        let mut frames = 0;
        while !self.stack.is_settled() {
            if frames >= MAX_SETTLE_FRAMES {
                bail!("swipe {step:?} still animating after {MAX_SETTLE_FRAMES} frames");
            }
            self.advance_frame();
            frames += 1;
        }
        Ok(())
    }
}

fn describe(layers: &[CardLayer]) -> String {
    if layers.is_empty() {
        return "<empty>".to_string();
    }
    layers
        .iter()
        .map(|layer| match layer.transform {
            CardTransform::Top {
                rotation,
                translation,
                opacity,
                content_opacity,
            } => format!(
                "#{} top(dx {:.1}, dy {:.1}, {rotation}, opacity {opacity:.2}, content {content_opacity:.2})",
                layer.card.id(),
                translation.x,
                translation.y
            ),
            CardTransform::Second { scale } => {
                format!("#{} second(scale {scale:.3})", layer.card.id())
            }
            CardTransform::None => format!("#{}", layer.card.id()),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn direction_name(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Left => "left",
        SwipeDirection::Right => "right",
    }
}

pub fn run(deck: DeckFile, steps: &[SwipeStep], log_every: usize) -> Result<SessionReport> {
    let runtime = Runtime::new();
    let stack = SwipeStack::with_config(deck.cards, deck.config, runtime.handle())?;
    let mut session = Session {
        stack,
        runtime,
        frame_time_nanos: 0,
        frames: 0,
        log_every,
    };
    log::info!("initial: {}", describe(&session.stack.render_layers()));

    for step in steps {
        session.play(*step)?;
        log::info!("settled: {}", describe(&session.stack.render_layers()));
    }

    Ok(SessionReport {
        frames: session.frames,
        dismissed: session
            .stack
            .dismissed()
            .into_iter()
            .map(|dismissed| DismissedEntry {
                id: dismissed.card.id(),
                caption: dismissed.card.caption().to_string(),
                direction: direction_name(dismissed.direction),
            })
            .collect(),
        remaining: session.stack.card_ids(),
    })
}
