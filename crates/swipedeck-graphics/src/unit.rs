//! Unit types

/// Angle in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Degrees(pub f32);

impl Degrees {
    pub const ZERO: Degrees = Degrees(0.0);

    pub fn to_radians(self) -> f32 {
        self.0.to_radians()
    }
}

impl std::fmt::Display for Degrees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}deg", self.0)
    }
}
