use serde::{Deserialize, Serialize};

use super::{Key, TrackerKind};

/// Snapshot of a tracker's internal state.
///
/// Snapshots contain only numbers, strings and lists, so they can be stored
/// with any serde format and restored into a fresh tracker of the same kind.
///
/// ```
/// use actrec_stats::tracker::{ContinuousTracker, Tracker as _, TrackerState};
///
/// let mut tracker = ContinuousTracker::new();
/// tracker.add(&vec![1.0, 2.0].into()).unwrap();
///
/// let json = serde_json::to_string(&tracker.state_dict()).unwrap();
/// assert_eq!(
///     json,
///     r#"{"kind":"continuous","count":2,"sum":3.0,"min_value":1.0,"max_value":2.0,"values":[1.0,2.0]}"#
/// );
///
/// let mut restored = ContinuousTracker::new();
/// restored.load_state_dict(serde_json::from_str::<TrackerState>(&json).unwrap()).unwrap();
/// assert_eq!(restored.statistics(), tracker.statistics());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerState {
    /// State of a tracker that holds nothing (unbound or disabled)
    Empty,
    Continuous(ContinuousState),
    Discrete(DiscreteState),
    Sequence(SequenceState),
}

impl TrackerState {
    /// Kind of tracker that produced the snapshot; `None` for [`TrackerState::Empty`].
    #[must_use]
    pub fn kind(&self) -> Option<TrackerKind> {
        match self {
            Self::Empty => None,
            Self::Continuous(_) => Some(TrackerKind::Continuous),
            Self::Discrete(_) => Some(TrackerKind::Discrete),
            Self::Sequence(_) => Some(TrackerKind::Sequence),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousState {
    pub count: u64,
    #[serde(with = "serde_f64")]
    pub sum: f64,
    #[serde(with = "serde_f64")]
    pub min_value: f64,
    #[serde(with = "serde_f64")]
    pub max_value: f64,
    /// Window contents, oldest first
    #[serde(with = "serde_f64_vec")]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteState {
    pub total: u64,
    /// `(value, occurrences)` pairs in first-seen order
    pub counter: Vec<(Key, u64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceState {
    pub values: Box<TrackerState>,
    pub lengths: ContinuousState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum FloatRepr {
    Finite(f64),
    NonFinite { float: NonFinite },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum NonFinite {
    #[serde(rename = "NaN")]
    Nan,
    #[serde(rename = "inf")]
    Inf,
    #[serde(rename = "-inf")]
    NegInf,
}

impl From<f64> for FloatRepr {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            return Self::Finite(value);
        }
        let float = if value.is_nan() {
            NonFinite::Nan
        } else if value.is_sign_positive() {
            NonFinite::Inf
        } else {
            NonFinite::NegInf
        };
        Self::NonFinite { float }
    }
}

impl From<FloatRepr> for f64 {
    fn from(repr: FloatRepr) -> Self {
        match repr {
            FloatRepr::Finite(value) => value,
            FloatRepr::NonFinite { float } => match float {
                NonFinite::Nan => f64::NAN,
                NonFinite::Inf => f64::INFINITY,
                NonFinite::NegInf => f64::NEG_INFINITY,
            },
        }
    }
}

/// Serde adapter for a float that may be `NaN` or infinite.
///
/// Finite values are plain numbers. The others are written as a tagged
/// object such as `{"float":"-inf"}`, since formats like JSON have no
/// literal for them.
pub(crate) mod serde_f64 {
    use serde::{Deserialize as _, Deserializer, Serialize as _, Serializer};

    use super::FloatRepr;

    #[expect(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FloatRepr::from(*value).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        FloatRepr::deserialize(deserializer).map(f64::from)
    }
}

/// [`serde_f64`] applied to every element of a list.
pub(crate) mod serde_f64_vec {
    use serde::{Deserialize as _, Deserializer, Serializer};

    use super::FloatRepr;

    pub(crate) fn serialize<S>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().copied().map(FloatRepr::from))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let reprs = Vec::<FloatRepr>::deserialize(deserializer)?;
        Ok(reprs.into_iter().map(f64::from).collect())
    }
}
