//! Error types shared by reducers, trackers and configuration.

use crate::tracker::TrackerKind;

/// The statistic a query was asked to compute.
///
/// Used to build error messages that name what could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Statistic {
    #[display("maximum")]
    Maximum,
    #[display("minimum")]
    Minimum,
    #[display("mean")]
    Mean,
    #[display("median")]
    Median,
    #[display("quantiles")]
    Quantiles,
    #[display("standard deviation")]
    StdDev,
    #[display("sum")]
    Sum,
    #[display("most common values")]
    MostCommon,
    #[display("statistics")]
    Statistics,
}

/// Raised by a [`Reducer`](crate::reducer::Reducer) when a reduction needs at
/// least one value but received an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Cannot compute the {statistic} because the summary is empty")]
pub struct EmptySequenceError {
    pub statistic: Statistic,
}

impl EmptySequenceError {
    #[must_use]
    pub const fn new(statistic: Statistic) -> Self {
        Self { statistic }
    }
}

/// Raised when a statistic is queried on a tracker that has not observed any
/// value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Cannot compute the {statistic} because the summary is empty")]
pub struct EmptyTrackerError {
    pub statistic: Statistic,
}

impl EmptyTrackerError {
    #[must_use]
    pub const fn new(statistic: Statistic) -> Self {
        Self { statistic }
    }
}

impl From<EmptySequenceError> for EmptyTrackerError {
    fn from(err: EmptySequenceError) -> Self {
        Self::new(err.statistic)
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrackerError {
    #[display("{_0}")]
    #[from]
    Empty(EmptyTrackerError),
    #[display("continuous tracker cannot absorb non-numeric value {value}")]
    NonNumeric {
        #[error(not(source))]
        value: String,
    },
    #[display("sequence tracker expects a sequence or an array with at least one dimension, got {value}")]
    NotASequence {
        #[error(not(source))]
        value: String,
    },
    #[display("cannot load a {found} state into a {expected} tracker")]
    StateMismatch {
        expected: TrackerKind,
        found: TrackerKind,
    },
    #[display("invalid tracker state: {reason}")]
    InvalidState {
        #[error(not(source))]
        reason: String,
    },
}

impl From<EmptySequenceError> for TrackerError {
    fn from(err: EmptySequenceError) -> Self {
        Self::Empty(err.into())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("max_size must be a positive integer")]
    ZeroMaxSize,
    #[display("quantile point {point} is outside [0, 1]")]
    InvalidQuantile {
        #[error(not(source))]
        point: f64,
    },
}
