//! Rating value object for stage feedback (1 to 10 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Stage rating on the 1-10 scale the model is asked to use.
///
/// Deserializes from any JSON number with an integral value in range, so a
/// model replying `7.0` is accepted while `7.5` or `11` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Number of stars the rating widget draws.
    pub const STARS: u8 = 5;

    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                value as i32,
            ))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Scales the rating onto the five-star widget.
    pub fn stars(&self) -> StarBreakdown {
        let stars = f64::from(self.0) / f64::from(Self::MAX) * f64::from(Self::STARS);
        let full = stars.floor() as u8;
        let half = stars.fract() >= 0.5;
        StarBreakdown {
            full,
            half,
            empty: Self::STARS - full - u8::from(half),
        }
    }
}

impl TryFrom<f64> for Rating {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ValidationError::invalid_format(
                "rating",
                format!("expected an integer, got {}", value),
            ));
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                value as i32,
            ));
        }
        Ok(Self(value as u8))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Full, half and empty star counts for a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarBreakdown {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}
