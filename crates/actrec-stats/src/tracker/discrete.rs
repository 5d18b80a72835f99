use std::{
    fmt,
    hash::{Hash, Hasher},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{DiscreteState, Tracker, TrackerKind, TrackerState};
use crate::{
    error::{EmptyTrackerError, Statistic, TrackerError},
    number::Number,
    statistics::Statistics,
    value::Value,
};

/// A float usable as a counter key.
///
/// Equality and hashing use the bit pattern, with `-0.0` folded into `0.0`
/// and every NaN folded into one canonical NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloatKey(#[serde(with = "super::state::serde_f64")] pub f64);

impl FloatKey {
    fn canonical_bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else if self.0 == 0.0 {
            0.0_f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for FloatKey {}

impl Hash for FloatKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

/// A categorical value counted by a [`DiscreteTracker`].
///
/// Sequences (and arrays) that appear as elements of a sequence are counted
/// as a single tuple key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Float(FloatKey),
    Str(String),
    Tuple(Vec<Key>),
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(v) => Self::Bool(*v),
            Value::Int(v) => Self::Int(*v),
            Value::Float(v) => Self::Float(FloatKey(*v)),
            Value::Str(v) => Self::Str(v.clone()),
            Value::Seq(items) => Self::Tuple(items.iter().map(Self::from).collect()),
            Value::Array(array) => Self::Tuple(array.to_values().iter().map(Self::from).collect()),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Key {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{:?}", v.0),
            Self::Str(v) => f.write_str(v),
            Self::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Exact frequency counter for categorical data.
///
/// Strings are atomic: adding `"meow"` counts one `"meow"`, never its
/// characters. Sequences and arrays are counted element by element.
///
/// # Examples
///
/// ```
/// use actrec_stats::{
///     number::Number,
///     tracker::{DiscreteTracker, Key, Tracker as _},
///     value::Value,
/// };
///
/// let mut tracker = DiscreteTracker::new();
/// tracker.add(&Value::from(vec![1, 1, 2, 3, 1, 2, 2, 1])).unwrap();
/// assert_eq!(
///     tracker.most_common(None).unwrap(),
///     vec![(Key::Int(1), 4), (Key::Int(2), 3), (Key::Int(3), 1)]
/// );
/// let stats = tracker.statistics().unwrap();
/// assert_eq!(stats.get("count_1"), Some(Number::Int(4)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiscreteTracker {
    counter: IndexMap<Key, u64>,
    total: u64,
}

impl DiscreteTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn increment(&mut self, key: Key) {
        *self.counter.entry(key).or_insert(0) += 1;
        self.total += 1;
    }

    /// Occurrences of `key` so far.
    #[must_use]
    pub fn occurrences(&self, key: &Key) -> u64 {
        self.counter.get(key).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn num_unique_values(&self) -> usize {
        self.counter.len()
    }

    /// Values ordered by decreasing count; ties keep first-seen order.
    ///
    /// With `Some(n)`, only the `n` most common values are returned.
    pub fn most_common(&self, n: Option<usize>) -> Result<Vec<(Key, u64)>, EmptyTrackerError> {
        if self.total == 0 {
            return Err(EmptyTrackerError::new(Statistic::MostCommon));
        }
        let mut entries = self
            .counter
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect::<Vec<_>>();
        entries.sort_by(|(_, a), (_, b)| b.cmp(a));
        if let Some(n) = n {
            entries.truncate(n);
        }
        Ok(entries)
    }

    #[must_use]
    pub fn state(&self) -> DiscreteState {
        DiscreteState {
            total: self.total,
            counter: self
                .counter
                .iter()
                .map(|(key, count)| (key.clone(), *count))
                .collect(),
        }
    }

    pub fn load_state(&mut self, state: DiscreteState) -> Result<(), TrackerError> {
        let DiscreteState { total, counter } = state;
        let entries = counter.len();
        let counted = counter
            .iter()
            .try_fold(0_u64, |acc, (_, n)| acc.checked_add(*n))
            .ok_or_else(|| TrackerError::InvalidState {
                reason: "counter overflows".to_string(),
            })?;
        if counted != total {
            return Err(TrackerError::InvalidState {
                reason: format!("counter sums to {counted} but total is {total}"),
            });
        }
        let counter = counter.into_iter().collect::<IndexMap<_, _>>();
        if counter.len() != entries {
            return Err(TrackerError::InvalidState {
                reason: format!(
                    "counter lists {entries} entries but only {} distinct keys",
                    counter.len()
                ),
            });
        }
        self.counter = counter;
        self.total = total;
        Ok(())
    }
}

impl Tracker for DiscreteTracker {
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError> {
        match datum {
            // strings before sequences: a string is one value
            Value::Str(_) => self.increment(Key::from(datum)),
            Value::Array(array) => {
                for value in array.to_values() {
                    self.increment(Key::from(&value));
                }
            }
            Value::Seq(items) => {
                for item in items {
                    self.increment(Key::from(item));
                }
            }
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => self.increment(Key::from(datum)),
        }
        Ok(())
    }

    fn count(&self) -> u64 {
        self.total
    }

    fn reset(&mut self) {
        self.counter.clear();
        self.total = 0;
    }

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        if self.total == 0 {
            return Err(EmptyTrackerError::new(Statistic::Statistics).into());
        }
        let mut stats = Statistics::new();
        stats.insert("count", Number::count(self.total));
        stats.insert("num_unique_values", Number::count(self.counter.len() as u64));
        for (key, count) in self.most_common(None)? {
            stats.insert(format!("count_{key}"), Number::count(count));
        }
        Ok(stats)
    }

    fn state_dict(&self) -> TrackerState {
        TrackerState::Discrete(self.state())
    }

    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError> {
        match state {
            TrackerState::Discrete(state) => self.load_state(state),
            TrackerState::Empty => {
                self.reset();
                Ok(())
            }
            other => Err(TrackerError::StateMismatch {
                expected: TrackerKind::Discrete,
                found: other.kind().unwrap_or(TrackerKind::Discrete),
            }),
        }
    }
}
