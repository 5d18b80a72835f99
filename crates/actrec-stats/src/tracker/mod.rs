//! Online statistics trackers.
//!
//! A tracker consumes a stream of [`Value`]s through [`Tracker::add`] and
//! answers statistical queries without retaining the whole stream.
//!
//! - [`ContinuousTracker`]: exact sum, count and extrema of a numeric stream,
//!   plus a bounded window of recent values for median, quantiles and std
//! - [`DiscreteTracker`]: exact frequency counts of categorical values
//! - [`AutoTracker`]: picks one of the two from the first datum it sees
//! - [`SequenceTracker`]: tracks sequence lengths alongside their elements
//! - [`NoOpTracker`]: accepts everything and reports nothing
//!
//! Trackers are plain single-threaded values; share one across threads only
//! behind a lock.
//!
//! # Examples
//!
//! ```
//! use actrec_stats::{
//!     number::Number,
//!     tracker::{AutoTracker, Tracker as _, TrackerKind},
//!     value::Value,
//! };
//!
//! let mut tracker = AutoTracker::new();
//! tracker.add(&Value::from(vec![1, 2, 3, 4])).unwrap();
//! assert_eq!(tracker.kind(), Some(TrackerKind::Continuous));
//!
//! let stats = tracker.statistics().unwrap();
//! assert_eq!(stats.get("count"), Some(Number::Int(4)));
//! assert_eq!(stats.get("median"), Some(Number::Float(2.0)));
//! ```

use std::fmt;

pub use self::{
    auto::{AutoTracker, classify},
    continuous::ContinuousTracker,
    discrete::{DiscreteTracker, FloatKey, Key},
    noop::NoOpTracker,
    sequence::SequenceTracker,
    state::{ContinuousState, DiscreteState, SequenceState, TrackerState},
};
use crate::{error::TrackerError, statistics::Statistics, value::Value};

mod auto;
mod continuous;
mod discrete;
mod noop;
mod sequence;
mod state;

/// Kind of a concrete tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TrackerKind {
    #[display("continuous")]
    Continuous,
    #[display("discrete")]
    Discrete,
    #[display("sequence")]
    Sequence,
}

/// Common interface of all trackers.
///
/// Queries that need at least one observation fail with
/// [`TrackerError::Empty`] on an empty tracker.
pub trait Tracker: fmt::Debug + Send {
    /// Adds one datum. Containers are flattened into their elements.
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError>;

    /// Number of elements (or sequences) added since creation or the last reset.
    fn count(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Forgets everything that was added. Idempotent.
    fn reset(&mut self);

    /// Computes the descriptive statistics of everything added so far.
    fn statistics(&self) -> Result<Statistics, TrackerError>;

    /// Human-readable rendering of [`Tracker::statistics`].
    fn summary(&self) -> Result<String, TrackerError> {
        Ok(self.statistics()?.to_string())
    }

    /// Snapshot of the internal state, made of plain data only.
    fn state_dict(&self) -> TrackerState;

    /// Restores a snapshot taken with [`Tracker::state_dict`].
    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError>;
}

impl<T> Tracker for Box<T>
where
    T: Tracker + ?Sized,
{
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError> {
        (**self).add(datum)
    }

    fn count(&self) -> u64 {
        (**self).count()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        (**self).statistics()
    }

    fn summary(&self) -> Result<String, TrackerError> {
        (**self).summary()
    }

    fn state_dict(&self) -> TrackerState {
        (**self).state_dict()
    }

    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError> {
        (**self).load_state_dict(state)
    }
}
