use super::{ContinuousTracker, DiscreteTracker, Tracker, TrackerKind, TrackerState};
use crate::{
    config::TrackerConfig,
    error::{EmptyTrackerError, Statistic, TrackerError},
    reducer::{self, Reducer},
    statistics::Statistics,
    value::Value,
};

/// Chooses the tracker kind suited to a datum.
///
/// - arrays with integer or float elements are continuous, other arrays discrete
/// - booleans and strings are discrete
/// - integers and floats are continuous
/// - a sequence whose elements are all integers or floats is continuous
/// - anything else, including mixed sequences, is discrete
///
/// ```
/// use actrec_stats::{
///     tracker::{TrackerKind, classify},
///     value::Value,
/// };
///
/// assert_eq!(classify(&Value::from(1.5)), TrackerKind::Continuous);
/// assert_eq!(classify(&Value::from(true)), TrackerKind::Discrete);
/// assert_eq!(classify(&Value::from(vec![1, 2])), TrackerKind::Continuous);
/// assert_eq!(
///     classify(&Value::from(vec![Value::from(1), Value::from("a")])),
///     TrackerKind::Discrete
/// );
/// ```
#[must_use]
pub fn classify(datum: &Value) -> TrackerKind {
    match datum {
        Value::Array(array) if array.element_kind().is_numeric() => TrackerKind::Continuous,
        Value::Array(_) | Value::Bool(_) | Value::Str(_) => TrackerKind::Discrete,
        Value::Int(_) | Value::Float(_) => TrackerKind::Continuous,
        Value::Seq(items) if items.iter().all(|v| v.is_int() || v.is_float()) => {
            TrackerKind::Continuous
        }
        Value::Seq(_) => TrackerKind::Discrete,
    }
}

#[derive(Debug, Clone)]
enum Bound {
    Continuous(ContinuousTracker),
    Discrete(DiscreteTracker),
}

impl Bound {
    fn new(kind: TrackerKind, config: &TrackerConfig, reducer: &'static dyn Reducer) -> Self {
        tracing::debug!(%kind, "binding auto tracker");
        match kind {
            TrackerKind::Continuous => {
                Self::Continuous(ContinuousTracker::with_reducer(config, reducer))
            }
            TrackerKind::Discrete | TrackerKind::Sequence => Self::Discrete(DiscreteTracker::new()),
        }
    }

    fn kind(&self) -> TrackerKind {
        match self {
            Self::Continuous(_) => TrackerKind::Continuous,
            Self::Discrete(_) => TrackerKind::Discrete,
        }
    }

    fn as_tracker(&self) -> &dyn Tracker {
        match self {
            Self::Continuous(t) => t,
            Self::Discrete(t) => t,
        }
    }

    fn as_tracker_mut(&mut self) -> &mut dyn Tracker {
        match self {
            Self::Continuous(t) => t,
            Self::Discrete(t) => t,
        }
    }
}

/// Tracker that decides between continuous and discrete tracking from the
/// first datum it receives.
///
/// The choice is permanent until [`Tracker::reset`], which drops the inner
/// tracker so the next datum is classified again. Later data of a different
/// kind is routed to the chosen tracker anyway; a continuous tracker rejects
/// strings with [`TrackerError::NonNumeric`].
///
/// # Examples
///
/// ```
/// use actrec_stats::{
///     tracker::{AutoTracker, Tracker as _, TrackerKind},
///     value::Value,
/// };
///
/// let mut tracker = AutoTracker::new();
/// assert_eq!(tracker.kind(), None);
///
/// tracker.add(&Value::from("walk")).unwrap();
/// assert_eq!(tracker.kind(), Some(TrackerKind::Discrete));
/// // still discrete: numbers are counted as categories
/// tracker.add(&Value::from(3)).unwrap();
/// assert_eq!(tracker.count(), 2);
///
/// tracker.reset();
/// tracker.add(&Value::from(3)).unwrap();
/// assert_eq!(tracker.kind(), Some(TrackerKind::Continuous));
/// ```
#[derive(Debug, Clone)]
pub struct AutoTracker {
    config: TrackerConfig,
    reducer: &'static dyn Reducer,
    inner: Option<Bound>,
}

impl Default for AutoTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    /// The configuration is used if the tracker binds to continuous tracking.
    #[must_use]
    pub fn with_config(config: TrackerConfig) -> Self {
        Self::with_reducer(config, reducer::auto_reducer())
    }

    #[must_use]
    pub fn with_reducer(config: TrackerConfig, reducer: &'static dyn Reducer) -> Self {
        Self {
            config,
            reducer,
            inner: None,
        }
    }

    /// The kind of the inner tracker; `None` until the first datum arrives.
    #[must_use]
    pub fn kind(&self) -> Option<TrackerKind> {
        self.inner.as_ref().map(Bound::kind)
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<&ContinuousTracker> {
        match &self.inner {
            Some(Bound::Continuous(t)) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_discrete(&self) -> Option<&DiscreteTracker> {
        match &self.inner {
            Some(Bound::Discrete(t)) => Some(t),
            _ => None,
        }
    }
}

impl Tracker for AutoTracker {
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError> {
        let inner = self
            .inner
            .get_or_insert_with(|| Bound::new(classify(datum), &self.config, self.reducer));
        inner.as_tracker_mut().add(datum)
    }

    fn count(&self) -> u64 {
        self.inner.as_ref().map_or(0, |t| t.as_tracker().count())
    }

    fn reset(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("unbinding auto tracker");
        }
    }

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        match &self.inner {
            Some(inner) => inner.as_tracker().statistics(),
            None => Err(EmptyTrackerError::new(Statistic::Statistics).into()),
        }
    }

    fn state_dict(&self) -> TrackerState {
        self.inner
            .as_ref()
            .map_or(TrackerState::Empty, |t| t.as_tracker().state_dict())
    }

    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError> {
        let Some(found) = state.kind() else {
            // an empty snapshot leaves an unbound tracker unbound
            if let Some(inner) = &mut self.inner {
                inner.as_tracker_mut().reset();
            }
            return Ok(());
        };
        if found == TrackerKind::Sequence {
            return Err(TrackerError::StateMismatch {
                expected: self.kind().unwrap_or(TrackerKind::Continuous),
                found,
            });
        }
        match &mut self.inner {
            Some(inner) => inner.as_tracker_mut().load_state_dict(state),
            None => {
                // bind only once the snapshot has been accepted
                let mut inner = Bound::new(found, &self.config, self.reducer);
                inner.as_tracker_mut().load_state_dict(state)?;
                self.inner = Some(inner);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        number::Number,
        tracker::{ContinuousState, Key},
        value::{ArrayValue, ElementKind},
    };

    #[test]
    fn test_classify() {
        use TrackerKind::{Continuous, Discrete};

        let float_array = ArrayValue::vector(vec![1.0, 2.0]);
        let int_array = ArrayValue::vector(vec![1_i64, 2]);
        let bool_array = ArrayValue::vector(vec![true]);
        let str_array = ArrayValue::vector(vec!["a".to_owned()]);
        assert_eq!(str_array.element_kind(), ElementKind::Str);

        assert_eq!(classify(&float_array.into()), Continuous);
        assert_eq!(classify(&int_array.into()), Continuous);
        assert_eq!(classify(&bool_array.into()), Discrete);
        assert_eq!(classify(&str_array.into()), Discrete);
        assert_eq!(classify(&Value::from(false)), Discrete);
        assert_eq!(classify(&Value::from("meow")), Discrete);
        assert_eq!(classify(&Value::from(1)), Continuous);
        assert_eq!(classify(&Value::from(0.5)), Continuous);
        assert_eq!(classify(&Value::from(vec![1.0, 2.0])), Continuous);
        assert_eq!(classify(&Value::from(vec![true, false])), Discrete);
        assert_eq!(classify(&Value::from(vec![vec![1], vec![2]])), Discrete);
        assert_eq!(classify(&Value::Seq(vec![])), Continuous);
    }

    #[test]
    fn test_unbound() {
        let mut tracker = AutoTracker::new();
        assert_eq!(tracker.count(), 0);
        assert_eq!(tracker.kind(), None);
        assert!(matches!(tracker.statistics(), Err(TrackerError::Empty(_))));
        assert_eq!(tracker.state_dict(), TrackerState::Empty);
        tracker.reset();
        tracker.load_state_dict(TrackerState::Empty).unwrap();
        assert_eq!(tracker.kind(), None);
    }

    #[test]
    fn test_binds_continuous() {
        let mut tracker = AutoTracker::new();
        tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
        assert_eq!(tracker.kind(), Some(TrackerKind::Continuous));
        assert_eq!(tracker.as_continuous().unwrap().sum().unwrap(), 6.0);
        assert!(tracker.as_discrete().is_none());
    }

    #[test]
    fn test_binding_is_permanent() {
        let mut tracker = AutoTracker::new();
        tracker.add(&Value::from(1)).unwrap();
        let err = tracker.add(&Value::from("meow")).unwrap_err();
        assert!(matches!(err, TrackerError::NonNumeric { .. }));
        assert_eq!(tracker.kind(), Some(TrackerKind::Continuous));
        assert_eq!(tracker.count(), 1);

        // numbers are still accepted afterwards
        tracker.add(&Value::from(2.5)).unwrap();
        assert_eq!(tracker.count(), 2);
    }

    #[test]
    fn test_discrete_absorbs_numbers() {
        let mut tracker = AutoTracker::new();
        tracker.add(&Value::from("meow")).unwrap();
        tracker.add(&Value::from(vec![1, 2])).unwrap();
        let discrete = tracker.as_discrete().unwrap();
        assert_eq!(discrete.occurrences(&Key::from("meow")), 1);
        assert_eq!(discrete.occurrences(&Key::Int(1)), 1);
        assert_eq!(tracker.count(), 3);
    }

    #[test]
    fn test_reset_reclassifies() {
        let mut tracker = AutoTracker::new();
        tracker.add(&Value::from(vec![1.0, 2.0])).unwrap();
        tracker.reset();
        assert_eq!(tracker.kind(), None);
        assert_eq!(tracker.count(), 0);

        tracker.add(&Value::from(vec!["a", "b"])).unwrap();
        assert_eq!(tracker.kind(), Some(TrackerKind::Discrete));
        assert_eq!(tracker.count(), 2);
        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.get("count"), Some(Number::Int(2)));
    }

    #[test]
    fn test_state_binds_unbound_tracker() {
        let mut source = AutoTracker::new();
        source.add(&Value::from(vec!["x", "y", "x"])).unwrap();

        let mut restored = AutoTracker::new();
        restored.load_state_dict(source.state_dict()).unwrap();
        assert_eq!(restored.kind(), Some(TrackerKind::Discrete));
        assert_eq!(restored.statistics(), source.statistics());
    }

    #[test]
    fn test_state_mismatch_when_bound() {
        let mut source = AutoTracker::new();
        source.add(&Value::from(1)).unwrap();

        let mut other = AutoTracker::new();
        other.add(&Value::from("a")).unwrap();
        let err = other.load_state_dict(source.state_dict()).unwrap_err();
        assert_eq!(
            err,
            TrackerError::StateMismatch {
                expected: TrackerKind::Discrete,
                found: TrackerKind::Continuous,
            }
        );
        assert_eq!(other.count(), 1);
    }

    #[test]
    fn test_rejected_state_leaves_tracker_unbound() {
        let invalid = TrackerState::Continuous(ContinuousState {
            count: 1,
            sum: 3.0,
            min_value: 1.0,
            max_value: 2.0,
            values: vec![1.0, 2.0],
        });
        let mut tracker = AutoTracker::new();
        let err = tracker.load_state_dict(invalid).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidState { .. }));
        assert_eq!(tracker.kind(), None);

        tracker.add(&Value::from("meow")).unwrap();
        assert_eq!(tracker.kind(), Some(TrackerKind::Discrete));
    }

    #[test]
    fn test_rejected_state_keeps_bound_data() {
        let mut tracker = AutoTracker::new();
        tracker.add(&Value::from(vec![1, 2])).unwrap();
        let invalid = TrackerState::Continuous(ContinuousState {
            count: 0,
            sum: 0.0,
            min_value: f64::INFINITY,
            max_value: f64::NEG_INFINITY,
            values: vec![5.0],
        });
        assert!(tracker.load_state_dict(invalid).is_err());
        assert_eq!(tracker.count(), 2);
        assert_eq!(tracker.as_continuous().unwrap().sum().unwrap(), 3.0);
    }

    #[test]
    fn test_uses_config() {
        let config = TrackerConfig::new(2, vec![0.5]).unwrap();
        let mut tracker = AutoTracker::with_config(config);
        tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
        let continuous = tracker.as_continuous().unwrap();
        assert_eq!(continuous.max_size(), 2);
        assert_eq!(continuous.window_values(), vec![2.0, 3.0]);
        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.get("quantile 0.500"), Some(Number::Float(2.5)));
    }
}
