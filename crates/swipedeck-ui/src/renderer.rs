//! Projection of the deck into paint-ordered layers.

use std::rc::Rc;

use smallvec::SmallVec;
use swipedeck_graphics::{Degrees, Point};

use crate::{AnimationState, CardRecord, SwipeStack};

/// Transform of a card, chosen by its position from the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardTransform {
    /// Painted untransformed.
    None,
    /// The top-most card follows the drag.
    Top {
        rotation: Degrees,
        translation: Point,
        opacity: f32,
        content_opacity: f32,
    },
    /// The card right behind the top one.
    Second { scale: f32 },
}

impl CardTransform {
    fn at_position(position: usize, state: &AnimationState) -> Self {
        match position {
            0 => CardTransform::Top {
                rotation: state.rotation,
                translation: state.offset,
                opacity: state.opacity,
                content_opacity: state.content_opacity,
            },
            1 => CardTransform::Second {
                scale: state.back_scale,
            },
            _ => CardTransform::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardLayer {
    pub card: Rc<CardRecord>,
    pub transform: CardTransform,
    /// Only the head card receives gestures, and only while it is not
    /// being dismissed.
    pub interactive: bool,
}

/// Layers in paint order: the top-most card comes last.
pub type RenderList = SmallVec<[CardLayer; 2]>;

/// Builds the render list for the current frame.
///
/// While a dismissed card fades out it keeps the top slot above the new head.
/// An empty deck renders nothing.
pub fn render_layers(stack: &SwipeStack) -> RenderList {
    let state = stack.animation_state();
    let leaving = stack.leaving();
    let head_interactive = leaving.is_none() && stack.phase().head_interactive();

    let mut layers: RenderList = leaving
        .into_iter()
        .chain(stack.visible())
        .take(stack.config().visible_cards)
        .enumerate()
        .map(|(position, card)| CardLayer {
            card,
            transform: CardTransform::at_position(position, &state),
            interactive: position == 0 && head_interactive,
        })
        .collect();
    layers.reverse();
    layers
}
