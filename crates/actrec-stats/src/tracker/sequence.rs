use super::{AutoTracker, ContinuousTracker, SequenceState, Tracker, TrackerKind, TrackerState};
use crate::{
    error::{EmptyTrackerError, Statistic, TrackerError},
    number::Number,
    statistics::Statistics,
    value::Value,
};

/// Tracker for sequence-valued data.
///
/// Every datum must be a sequence (or an array with at least one axis). Its
/// length, the size of the first axis, goes to a continuous tracker and the
/// whole datum goes to the value tracker, which flattens it.
///
/// Statistics are reported with a `length ` prefix for the lengths and a
/// `value ` prefix for the elements.
///
/// # Examples
///
/// ```
/// use actrec_stats::{
///     number::Number,
///     tracker::{SequenceTracker, Tracker as _},
///     value::Value,
/// };
///
/// let mut tracker = SequenceTracker::new();
/// tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
/// tracker.add(&Value::from(vec![4])).unwrap();
///
/// assert_eq!(tracker.count(), 2);
/// let stats = tracker.statistics().unwrap();
/// assert_eq!(stats.get("length max"), Some(Number::Float(3.0)));
/// assert_eq!(stats.get("value sum"), Some(Number::Float(10.0)));
/// ```
#[derive(Debug, Clone)]
pub struct SequenceTracker<T = AutoTracker> {
    values: T,
    lengths: ContinuousTracker,
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_values(AutoTracker::new(), ContinuousTracker::new())
    }
}

impl<T> SequenceTracker<T>
where
    T: Tracker,
{
    #[must_use]
    pub fn with_values(values: T, lengths: ContinuousTracker) -> Self {
        Self { values, lengths }
    }

    #[must_use]
    pub fn values(&self) -> &T {
        &self.values
    }

    #[must_use]
    pub fn lengths(&self) -> &ContinuousTracker {
        &self.lengths
    }
}

fn sequence_length(datum: &Value) -> Result<usize, TrackerError> {
    match datum {
        Value::Seq(items) => Ok(items.len()),
        Value::Array(array) if !array.shape().is_empty() => Ok(array.shape()[0]),
        other => Err(TrackerError::NotASequence {
            value: other.to_string(),
        }),
    }
}

impl<T> Tracker for SequenceTracker<T>
where
    T: Tracker,
{
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError> {
        #[expect(clippy::cast_precision_loss)]
        let length = sequence_length(datum)? as f64;
        self.values.add(datum)?;
        self.lengths.add_value(length);
        Ok(())
    }

    /// Number of sequences added.
    fn count(&self) -> u64 {
        self.lengths.count()
    }

    fn reset(&mut self) {
        self.values.reset();
        self.lengths.reset();
    }

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        if self.lengths.is_empty() {
            return Err(EmptyTrackerError::new(Statistic::Statistics).into());
        }
        let mut stats = Statistics::new();
        stats.insert("count", Number::count(self.count()));
        stats.extend_prefixed("length ", self.lengths.statistics()?);
        if !self.values.is_empty() {
            stats.extend_prefixed("value ", self.values.statistics()?);
        }
        Ok(stats)
    }

    fn state_dict(&self) -> TrackerState {
        TrackerState::Sequence(SequenceState {
            values: Box::new(self.values.state_dict()),
            lengths: self.lengths.state(),
        })
    }

    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError> {
        match state {
            TrackerState::Sequence(SequenceState { values, lengths }) => {
                let mut restored = self.lengths.clone();
                restored.load_state(lengths)?;
                self.values.load_state_dict(*values)?;
                self.lengths = restored;
                Ok(())
            }
            TrackerState::Empty => {
                self.reset();
                Ok(())
            }
            other => Err(TrackerError::StateMismatch {
                expected: TrackerKind::Sequence,
                found: other.kind().unwrap_or(TrackerKind::Sequence),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        tracker::{DiscreteTracker, Key},
        value::{ArrayData, ArrayValue},
    };

    #[test]
    fn test_empty() {
        let tracker = SequenceTracker::new();
        assert_eq!(tracker.count(), 0);
        assert!(matches!(tracker.statistics(), Err(TrackerError::Empty(_))));
    }

    #[test]
    fn test_rejects_scalars() {
        let mut tracker = SequenceTracker::new();
        for datum in [Value::from(1), Value::from("abc"), Value::from(true)] {
            let err = tracker.add(&datum).unwrap_err();
            assert!(matches!(err, TrackerError::NotASequence { .. }));
        }
        let scalar_array = ArrayValue::new(vec![], ArrayData::Float(vec![1.0])).unwrap();
        assert!(tracker.add(&scalar_array.into()).is_err());
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_lengths_and_values() {
        let mut tracker = SequenceTracker::new();
        tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
        tracker.add(&Value::from(vec![4, 5])).unwrap();
        tracker.add(&Value::Seq(vec![])).unwrap();

        assert_eq!(tracker.count(), 3);
        assert_eq!(tracker.lengths().sum().unwrap(), 5.0);
        assert_eq!(tracker.values().count(), 5);

        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.get("count"), Some(Number::Int(3)));
        assert_eq!(stats.get("length count"), Some(Number::Int(3)));
        assert_eq!(stats.get("length min"), Some(Number::Float(0.0)));
        assert_eq!(stats.get("value count"), Some(Number::Int(5)));
        assert_eq!(stats.get("value max"), Some(Number::Float(5.0)));
    }

    #[test]
    fn test_only_empty_sequences() {
        let mut tracker = SequenceTracker::new();
        tracker.add(&Value::Seq(vec![])).unwrap();
        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.get("length max"), Some(Number::Float(0.0)));
        assert!(stats.keys().all(|k| !k.starts_with("value ")));
    }

    #[test]
    fn test_array_length_is_first_axis() {
        let mut tracker = SequenceTracker::new();
        let array = ArrayValue::new(vec![2, 3], ArrayData::Int(vec![1, 2, 3, 4, 5, 6])).unwrap();
        tracker.add(&array.into()).unwrap();
        assert_eq!(tracker.lengths().max().unwrap(), 2.0);
        assert_eq!(tracker.values().count(), 6);
    }

    #[test]
    fn test_discrete_values() {
        let mut tracker =
            SequenceTracker::with_values(DiscreteTracker::new(), ContinuousTracker::new());
        tracker.add(&Value::from(vec!["a", "b", "a"])).unwrap();
        assert_eq!(tracker.values().occurrences(&Key::from("a")), 2);
        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.get("value count_a"), Some(Number::Int(2)));
    }

    #[test]
    fn test_reset() {
        let mut tracker = SequenceTracker::new();
        tracker.add(&Value::from(vec![1.0])).unwrap();
        tracker.reset();
        assert_eq!(tracker.count(), 0);
        assert!(tracker.values().kind().is_none());
    }

    #[test]
    fn test_state_round_trip() {
        let mut tracker = SequenceTracker::new();
        tracker.add(&Value::from(vec!["x", "y"])).unwrap();
        tracker.add(&Value::from(vec!["x"])).unwrap();

        let json = serde_json::to_string(&tracker.state_dict()).unwrap();
        let mut restored = SequenceTracker::new();
        restored
            .load_state_dict(serde_json::from_str(&json).unwrap())
            .unwrap();
        assert_eq!(restored.statistics(), tracker.statistics());

        let err = restored
            .load_state_dict(ContinuousTracker::new().state_dict())
            .unwrap_err();
        assert!(matches!(err, TrackerError::StateMismatch { .. }));
    }

    #[test]
    fn test_rejected_values_state_keeps_lengths() {
        let mut other = SequenceTracker::new();
        other.add(&Value::from(vec!["a", "b"])).unwrap();
        let snapshot = other.state_dict();

        let mut tracker = SequenceTracker::new();
        tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
        let err = tracker.load_state_dict(snapshot).unwrap_err();
        assert!(matches!(err, TrackerError::StateMismatch { .. }));
        assert_eq!(tracker.count(), 1);
        assert_eq!(tracker.lengths().max().unwrap(), 3.0);
        assert_eq!(tracker.values().count(), 3);
    }
}
