//! Piecewise-linear value mapping.

use smallvec::SmallVec;
use std::fmt;

/// Behaviour outside the input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolate {
    /// Continue the slope of the outermost segment.
    #[default]
    Extend,
    /// Hold the outermost output value.
    Clamp,
    /// Return the input unchanged.
    Identity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    TooFewPoints { len: usize },
    LengthMismatch { input: usize, output: usize },
    NotIncreasing { index: usize },
    NonFinite { index: usize },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::TooFewPoints { len } => {
                write!(f, "interpolation needs at least 2 points, got {len}")
            }
            InterpolationError::LengthMismatch { input, output } => write!(
                f,
                "input range has {input} points but output range has {output}"
            ),
            InterpolationError::NotIncreasing { index } => {
                write!(f, "input range must be strictly increasing at index {index}")
            }
            InterpolationError::NonFinite { index } => {
                write!(f, "non-finite value at index {index}")
            }
        }
    }
}

impl std::error::Error for InterpolationError {}

/// Maps an input value through `input_range → output_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    input: SmallVec<[f32; 4]>,
    output: SmallVec<[f32; 4]>,
    extrapolate_left: Extrapolate,
    extrapolate_right: Extrapolate,
}

impl Interpolation {
    pub fn new(input_range: &[f32], output_range: &[f32]) -> Result<Self, InterpolationError> {
        if input_range.len() != output_range.len() {
            return Err(InterpolationError::LengthMismatch {
                input: input_range.len(),
                output: output_range.len(),
            });
        }
        if input_range.len() < 2 {
            return Err(InterpolationError::TooFewPoints {
                len: input_range.len(),
            });
        }
        for (index, (input, output)) in input_range.iter().zip(output_range).enumerate() {
            if !input.is_finite() || !output.is_finite() {
                return Err(InterpolationError::NonFinite { index });
            }
        }
        if let Some(index) = input_range.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(InterpolationError::NotIncreasing { index: index + 1 });
        }

        Ok(Self {
            input: SmallVec::from_slice(input_range),
            output: SmallVec::from_slice(output_range),
            extrapolate_left: Extrapolate::default(),
            extrapolate_right: Extrapolate::default(),
        })
    }

    /// Use the same extrapolation on both sides.
    pub fn with_extrapolate(self, extrapolate: Extrapolate) -> Self {
        self.with_extrapolate_left(extrapolate)
            .with_extrapolate_right(extrapolate)
    }

    pub fn with_extrapolate_left(mut self, extrapolate: Extrapolate) -> Self {
        self.extrapolate_left = extrapolate;
        self
    }

    pub fn with_extrapolate_right(mut self, extrapolate: Extrapolate) -> Self {
        self.extrapolate_right = extrapolate;
        self
    }

    pub fn apply(&self, value: f32) -> f32 {
        let last = self.input.len() - 1;
        if value < self.input[0] {
            return self.outside(value, 0, self.extrapolate_left);
        }
        if value > self.input[last] {
            return self.outside(value, last - 1, self.extrapolate_right);
        }
        // Segment whose upper input is the first one >= value.
        let upper = self
            .input
            .iter()
            .position(|&bound| value <= bound)
            .unwrap_or(last)
            .max(1);
        self.along(value, upper - 1)
    }

    fn outside(&self, value: f32, segment: usize, extrapolate: Extrapolate) -> f32 {
        match extrapolate {
            Extrapolate::Extend => self.along(value, segment),
            Extrapolate::Identity => value,
            Extrapolate::Clamp => {
                if value < self.input[0] {
                    self.output[0]
                } else {
                    self.output[self.output.len() - 1]
                }
            }
        }
    }

    fn along(&self, value: f32, segment: usize) -> f32 {
        let (in_start, in_end) = (self.input[segment], self.input[segment + 1]);
        let (out_start, out_end) = (self.output[segment], self.output[segment + 1]);
        let fraction = (value - in_start) / (in_end - in_start);
        out_start + (out_end - out_start) * fraction
    }
}
