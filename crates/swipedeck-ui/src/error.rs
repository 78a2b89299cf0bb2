use std::fmt;

use swipedeck_animation::{AnimationSpecError, InterpolationError};

use crate::CardId;

/// Errors raised while building a swipe stack.
///
/// Gestures and animations never fail once the stack exists.
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeError {
    DuplicateCardId { id: CardId },
    InvalidConfig { field: &'static str, reason: String },
}

impl SwipeError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        SwipeError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn from_spec(field: &'static str, err: AnimationSpecError) -> Self {
        Self::invalid_config(field, err.to_string())
    }

    pub(crate) fn from_interpolation(field: &'static str, err: InterpolationError) -> Self {
        Self::invalid_config(field, err.to_string())
    }
}

impl fmt::Display for SwipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwipeError::DuplicateCardId { id } => write!(f, "duplicate card id {id}"),
            SwipeError::InvalidConfig { field, reason } => {
                write!(f, "invalid swipe stack config `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for SwipeError {}
