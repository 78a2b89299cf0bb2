//! Tunables of the swipe stack.

use serde::{Deserialize, Serialize};
use swipedeck_animation::{
    AnimationSpec, ExponentialDecaySpec, Extrapolate, FloatDecayAnimationSpec, Interpolation,
    SpringSpec,
};
use swipedeck_graphics::{Point, Rect, Size};

use crate::{SwipeError, SwipePolicy};

/// Every field has a default, so a deck file may override any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwipeStackConfig {
    /// Horizontal travel beyond which a release dismisses the head card.
    pub max_swipe_distance: f32,
    /// Per-millisecond velocity multiplier of the dismiss trajectory.
    pub decay_deceleration: f32,
    /// Origami friction of the snap-back and back-card springs.
    pub spring_friction: f32,
    /// Origami tension of the snap-back and back-card springs.
    pub spring_tension: f32,
    /// Fade-out of the dismissed card.
    pub fade_duration_millis: u64,
    /// Resting scale of the card behind the head.
    pub back_card_scale: f32,
    pub max_rotation_degrees: f32,
    /// Horizontal offset at which rotation and content opacity saturate.
    pub interpolation_distance: f32,
    pub min_content_opacity: f32,
    /// Half-extent around the rest position; the dismiss trajectory ends
    /// when the card leaves it.
    pub dismiss_bounds: Size,
    /// Head card area in host coordinates at rest. `None` accepts a
    /// pointer-down anywhere.
    pub card_bounds: Option<Rect>,
    /// Number of queue entries painted.
    pub visible_cards: usize,
}

impl Default for SwipeStackConfig {
    fn default() -> Self {
        Self {
            max_swipe_distance: SwipePolicy::DEFAULT_MAX_SWIPE_DISTANCE,
            decay_deceleration: 0.98,
            spring_friction: 4.0,
            spring_tension: SpringSpec::DEFAULT_TENSION,
            fade_duration_millis: 100,
            back_card_scale: 0.9,
            max_rotation_degrees: 40.0,
            interpolation_distance: 200.0,
            min_content_opacity: 0.5,
            dismiss_bounds: Size::new(600.0, 1000.0),
            card_bounds: None,
            visible_cards: 2,
        }
    }
}

impl SwipeStackConfig {
    pub fn validate(&self) -> Result<(), SwipeError> {
        if !(self.max_swipe_distance.is_finite() && self.max_swipe_distance >= 0.0) {
            return Err(SwipeError::invalid_config(
                "max_swipe_distance",
                "must be a finite, non-negative distance",
            ));
        }
        self.decay_spec()
            .validate()
            .map_err(|err| SwipeError::from_spec("decay_deceleration", err))?;
        self.spring_spec().validate().map_err(|err| {
            let field = if err.field == "stiffness" {
                "spring_tension"
            } else {
                "spring_friction"
            };
            SwipeError::from_spec(field, err)
        })?;
        self.fade_spec()
            .validate()
            .map_err(|err| SwipeError::from_spec("fade_duration_millis", err))?;
        if !(self.back_card_scale > 0.0 && self.back_card_scale <= 1.0) {
            return Err(SwipeError::invalid_config(
                "back_card_scale",
                "must be in (0, 1]",
            ));
        }
        if !(self.interpolation_distance.is_finite() && self.interpolation_distance > 0.0) {
            return Err(SwipeError::invalid_config(
                "interpolation_distance",
                "must be a finite, positive distance",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_content_opacity) {
            return Err(SwipeError::invalid_config(
                "min_content_opacity",
                "must be in [0, 1]",
            ));
        }
        let bounds = self.dismiss_bounds;
        if !(bounds.width.is_finite() && bounds.height.is_finite())
            || bounds.width <= 0.0
            || bounds.height <= 0.0
        {
            return Err(SwipeError::invalid_config(
                "dismiss_bounds",
                "half-extent must be finite and positive",
            ));
        }
        if let Some(card) = self.card_bounds {
            let finite = [card.x, card.y, card.width, card.height]
                .iter()
                .all(|value| value.is_finite());
            if !finite || card.width < 0.0 || card.height < 0.0 {
                return Err(SwipeError::invalid_config(
                    "card_bounds",
                    "must be finite with a non-negative size",
                ));
            }
        }
        if self.visible_cards == 0 {
            return Err(SwipeError::invalid_config(
                "visible_cards",
                "at least the head card must be visible",
            ));
        }
        self.rotation_interpolation()?;
        self.content_opacity_interpolation()?;
        Ok(())
    }

    pub fn policy(&self) -> SwipePolicy {
        SwipePolicy::new(self.max_swipe_distance)
    }

    pub fn spring_spec(&self) -> SpringSpec {
        SpringSpec::from_friction_tension(self.spring_friction, self.spring_tension)
    }

    pub fn decay_spec(&self) -> ExponentialDecaySpec {
        ExponentialDecaySpec::new(self.decay_deceleration)
    }

    pub fn fade_spec(&self) -> AnimationSpec {
        AnimationSpec::linear(self.fade_duration_millis)
    }

    /// Bounds of the card offset while it is being dismissed.
    pub fn dismiss_rect(&self) -> Rect {
        Rect::from_center_half_extent(Point::ZERO, self.dismiss_bounds)
    }

    /// Card offset `x` to rotation in degrees.
    pub fn rotation_interpolation(&self) -> Result<Interpolation, SwipeError> {
        let distance = self.interpolation_distance;
        let angle = self.max_rotation_degrees;
        Interpolation::new(&[-distance, 0.0, distance], &[-angle, 0.0, angle])
            .map(|interpolation| interpolation.with_extrapolate(Extrapolate::Clamp))
            .map_err(|err| SwipeError::from_interpolation("max_rotation_degrees", err))
    }

    /// Card offset `x` to opacity of the card content.
    pub fn content_opacity_interpolation(&self) -> Result<Interpolation, SwipeError> {
        let distance = self.interpolation_distance;
        let faded = self.min_content_opacity;
        Interpolation::new(&[-distance, 0.0, distance], &[faded, 1.0, faded])
            .map(|interpolation| interpolation.with_extrapolate(Extrapolate::Clamp))
            .map_err(|err| SwipeError::from_interpolation("min_content_opacity", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: SwipeStackConfig) -> &'static str {
        match config.validate() {
            Err(SwipeError::InvalidConfig { field, .. }) => field,
            other => panic!("expected an invalid config, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = SwipeStackConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.policy().max_swipe_distance(), 120.0);
        assert_eq!(config.fade_spec().duration_millis, 100);
        assert_eq!(config.dismiss_rect().x, -600.0);
        assert_eq!(config.dismiss_rect().bottom(), 1000.0);
    }

    #[test]
    fn rotation_and_content_opacity_saturate() {
        let config = SwipeStackConfig::default();
        let rotation = config.rotation_interpolation().expect("valid");
        assert_eq!(rotation.apply(-200.0), -40.0);
        assert_eq!(rotation.apply(0.0), 0.0);
        assert_eq!(rotation.apply(200.0), 40.0);
        assert_eq!(rotation.apply(400.0), 40.0);

        let opacity = config.content_opacity_interpolation().expect("valid");
        assert_eq!(opacity.apply(0.0), 1.0);
        assert_eq!(opacity.apply(-200.0), 0.5);
        assert_eq!(opacity.apply(600.0), 0.5);
    }

    #[test]
    fn rejects_malformed_values() {
        let cases: [(SwipeStackConfig, &str); 8] = [
            (
                SwipeStackConfig {
                    decay_deceleration: 1.0,
                    ..Default::default()
                },
                "decay_deceleration",
            ),
            (
                SwipeStackConfig {
                    spring_tension: 0.0,
                    ..Default::default()
                },
                "spring_tension",
            ),
            (
                SwipeStackConfig {
                    spring_friction: 0.0,
                    ..Default::default()
                },
                "spring_friction",
            ),
            (
                SwipeStackConfig {
                    fade_duration_millis: u64::MAX,
                    ..Default::default()
                },
                "fade_duration_millis",
            ),
            (
                SwipeStackConfig {
                    back_card_scale: 1.5,
                    ..Default::default()
                },
                "back_card_scale",
            ),
            (
                SwipeStackConfig {
                    max_swipe_distance: f32::NAN,
                    ..Default::default()
                },
                "max_swipe_distance",
            ),
            (
                SwipeStackConfig {
                    max_rotation_degrees: f32::INFINITY,
                    ..Default::default()
                },
                "max_rotation_degrees",
            ),
            (
                SwipeStackConfig {
                    visible_cards: 0,
                    ..Default::default()
                },
                "visible_cards",
            ),
        ];
        for (config, field) in cases {
            assert_eq!(invalid_field(config), field);
        }
    }

    #[test]
    fn oversized_fade_from_json_is_rejected() {
        let config: SwipeStackConfig =
            serde_json::from_str(r#"{"fadeDurationMillis": 18446744073709551615}"#)
                .expect("u64 fits");
        assert_eq!(invalid_field(config), "fade_duration_millis");
    }

    #[test]
    fn deserializes_partial_overrides() {
        let config: SwipeStackConfig = serde_json::from_str(
            r#"{"maxSwipeDistance": 80, "dismissBounds": {"width": 400, "height": 800}}"#,
        )
        .expect("valid config");
        assert_eq!(config.max_swipe_distance, 80.0);
        assert_eq!(config.dismiss_bounds, Size::new(400.0, 800.0));
        assert_eq!(config.decay_deceleration, 0.98);
        assert_eq!(config.visible_cards, 2);
    }
}
