use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// A real number as seen by the reducers: either an integer or a float.
///
/// Selection-type reductions (max, min, median, sort) hand back the original
/// element, so an all-integer input yields an integer result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Builds an integer number from an unsigned count, saturating at `i64::MAX`.
    #[must_use]
    pub fn count(n: u64) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Converts to a float, keeping the value.
    #[must_use]
    pub fn to_float(self) -> Self {
        Self::Float(self.as_f64())
    }

    /// Total ordering over numbers.
    ///
    /// Two integers compare exactly; every other pair compares as `f64` with
    /// [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Float(value.into())
    }
}

/// Collects anything convertible into numbers, e.g. `numbers([1, 2, 3])`.
pub fn numbers<I>(values: I) -> Vec<Number>
where
    I: IntoIterator,
    I::Item: Into<Number>,
{
    values.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cmp_mixed() {
        assert_eq!(Number::Int(1).total_cmp(&Number::Float(1.5)), Ordering::Less);
        assert_eq!(Number::Float(2.0).total_cmp(&Number::Int(2)), Ordering::Equal);
        assert_eq!(
            Number::Int(i64::MAX).total_cmp(&Number::Int(i64::MAX - 1)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(Number::Int(2).to_string(), "2");
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
        assert_eq!(Number::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_count_saturates() {
        assert_eq!(Number::count(3), Number::Int(3));
        assert_eq!(Number::count(u64::MAX), Number::Int(i64::MAX));
    }
}
