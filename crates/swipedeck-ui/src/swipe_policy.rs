//! Release classification.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDecision {
    Dismiss(SwipeDirection),
    SnapBack,
}

/// Horizontal distance threshold. Vertical travel and release velocity play
/// no part in the decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipePolicy {
    max_swipe_distance: f32,
}

impl SwipePolicy {
    pub const DEFAULT_MAX_SWIPE_DISTANCE: f32 = 120.0;

    pub fn new(max_swipe_distance: f32) -> Self {
        Self { max_swipe_distance }
    }

    pub fn max_swipe_distance(&self) -> f32 {
        self.max_swipe_distance
    }

    /// Dismiss only when the card travelled strictly further than the threshold.
    pub fn classify(&self, dx: f32) -> SwipeDecision {
        if dx > self.max_swipe_distance {
            SwipeDecision::Dismiss(SwipeDirection::Right)
        } else if dx < -self.max_swipe_distance {
            SwipeDecision::Dismiss(SwipeDirection::Left)
        } else {
            SwipeDecision::SnapBack
        }
    }
}

impl Default for SwipePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SWIPE_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let policy = SwipePolicy::default();
        assert_eq!(policy.classify(120.0), SwipeDecision::SnapBack);
        assert_eq!(policy.classify(-120.0), SwipeDecision::SnapBack);
        assert_eq!(
            policy.classify(120.0001),
            SwipeDecision::Dismiss(SwipeDirection::Right)
        );
        assert_eq!(
            policy.classify(-120.0001),
            SwipeDecision::Dismiss(SwipeDirection::Left)
        );
    }

    #[test]
    fn small_and_non_finite_moves_snap_back() {
        let policy = SwipePolicy::default();
        for dx in [0.0, 50.0, -50.0, -0.0, f32::NAN] {
            assert_eq!(policy.classify(dx), SwipeDecision::SnapBack, "dx {dx}");
        }
    }

    #[test]
    fn custom_threshold() {
        let policy = SwipePolicy::new(40.0);
        assert_eq!(
            policy.classify(41.0),
            SwipeDecision::Dismiss(SwipeDirection::Right)
        );
        assert_eq!(policy.max_swipe_distance(), 40.0);
    }
}
