use super::{ContinuousState, Tracker, TrackerKind, TrackerState};
use crate::{
    config::TrackerConfig,
    error::{EmptyTrackerError, Statistic, TrackerError},
    number::Number,
    reducer::{self, Reducer},
    statistics::Statistics,
    value::{ArrayData, Value},
    window::Window,
};

/// Online tracker for numeric streams.
///
/// `count`, `sum`, `min` and `max` are exact over everything ever added.
/// `median`, `quantiles` and `std` are computed over a window holding the
/// most recent `max_size` values, so they become approximations once more
/// values than that have been added.
///
/// # Examples
///
/// ```
/// use actrec_stats::{
///     config::TrackerConfig,
///     tracker::{ContinuousTracker, Tracker as _},
///     value::Value,
/// };
///
/// let config = TrackerConfig::new(3, vec![0.5]).unwrap();
/// let mut tracker = ContinuousTracker::with_config(&config);
/// tracker.add(&Value::from(vec![10, 1, 2, 3])).unwrap();
///
/// assert_eq!(tracker.count(), 4);
/// assert_eq!(tracker.sum().unwrap(), 16.0);
/// assert_eq!(tracker.max().unwrap(), 10.0);
/// // the window only retains [1, 2, 3]
/// assert_eq!(tracker.median().unwrap(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ContinuousTracker {
    sum: f64,
    count: u64,
    min_value: f64,
    max_value: f64,
    window: Window,
    quantile_points: Vec<f64>,
    reducer: &'static dyn Reducer,
}

impl Default for ContinuousTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContinuousTracker {
    /// Creates a tracker with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&TrackerConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &TrackerConfig) -> Self {
        Self::with_reducer(config, reducer::auto_reducer())
    }

    /// Like [`Self::with_config`], but with an explicit reducer backend.
    #[must_use]
    pub fn with_reducer(config: &TrackerConfig, reducer: &'static dyn Reducer) -> Self {
        Self {
            sum: 0.0,
            count: 0,
            min_value: f64::INFINITY,
            max_value: f64::NEG_INFINITY,
            window: Window::new(config.max_size()),
            quantile_points: config.quantiles().to_vec(),
            reducer,
        }
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.window.capacity()
    }

    #[must_use]
    pub fn quantile_points(&self) -> &[f64] {
        &self.quantile_points
    }

    /// Values currently retained in the window, oldest first.
    #[must_use]
    pub fn window_values(&self) -> Vec<f64> {
        self.window.to_vec()
    }

    /// Adds a single number.
    pub fn add_value(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min_value = self.min_value.min(value);
        self.max_value = self.max_value.max(value);
        self.window.push(value);
    }

    fn ensure_non_empty(&self, statistic: Statistic) -> Result<(), EmptyTrackerError> {
        if self.count == 0 {
            return Err(EmptyTrackerError::new(statistic));
        }
        Ok(())
    }

    fn window_numbers(&self) -> Vec<Number> {
        self.window.iter().map(Number::Float).collect()
    }

    pub fn sum(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Sum)?;
        Ok(self.sum)
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Mean)?;
        Ok(self.sum / self.count as f64)
    }

    pub fn max(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Maximum)?;
        Ok(self.max_value)
    }

    pub fn min(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Minimum)?;
        Ok(self.min_value)
    }

    /// Lower median of the window.
    pub fn median(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Median)?;
        Ok(self.reducer.median(&self.window_numbers())?.as_f64())
    }

    /// Sample standard deviation of the window; `NaN` for a single value.
    pub fn std(&self) -> Result<f64, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::StdDev)?;
        Ok(self.reducer.std(&self.window_numbers())?)
    }

    /// `(point, value)` pairs for each configured quantile point.
    pub fn quantiles(&self) -> Result<Vec<(f64, f64)>, EmptyTrackerError> {
        self.ensure_non_empty(Statistic::Quantiles)?;
        let values = self
            .reducer
            .quantile(&self.window_numbers(), &self.quantile_points)?;
        Ok(self.quantile_points.iter().copied().zip(values).collect())
    }

    /// Snapshot of the exact aggregates and the window.
    #[must_use]
    pub fn state(&self) -> ContinuousState {
        ContinuousState {
            count: self.count,
            sum: self.sum,
            min_value: self.min_value,
            max_value: self.max_value,
            values: self.window.to_vec(),
        }
    }

    /// Restores a snapshot taken with [`Self::state`].
    ///
    /// If the snapshot window is larger than this tracker's `max_size`, only
    /// its most recent values are kept.
    ///
    /// # Arguments
    ///
    /// * `state` - Counters, extrema and window contents to restore
    ///
    /// # Returns
    ///
    /// [`TrackerError::InvalidState`] if the window holds more values than
    /// `count`. The tracker is left untouched in that case.
    pub fn load_state(&mut self, state: ContinuousState) -> Result<(), TrackerError> {
        let ContinuousState {
            count,
            sum,
            min_value,
            max_value,
            values,
        } = state;
        if (values.len() as u64) > count {
            return Err(TrackerError::InvalidState {
                reason: format!(
                    "window holds {} values but count is {count}",
                    values.len()
                ),
            });
        }
        self.count = count;
        self.sum = sum;
        self.min_value = min_value;
        self.max_value = max_value;
        self.window.clear();
        self.window.extend(values);
        Ok(())
    }
}

/// Flattens a datum into its numeric elements.
///
/// Booleans count as `0`/`1`. Any string makes the whole datum invalid.
#[expect(clippy::cast_precision_loss)]
fn collect_numbers(datum: &Value, out: &mut Vec<f64>) -> Result<(), TrackerError> {
    match datum {
        Value::Bool(v) => out.push(f64::from(u8::from(*v))),
        Value::Int(v) => out.push(*v as f64),
        Value::Float(v) => out.push(*v),
        Value::Str(_) => {
            return Err(TrackerError::NonNumeric {
                value: datum.to_string(),
            });
        }
        Value::Seq(items) => {
            for item in items {
                collect_numbers(item, out)?;
            }
        }
        Value::Array(array) => match array.data() {
            ArrayData::Bool(v) => out.extend(v.iter().map(|b| f64::from(u8::from(*b)))),
            ArrayData::Int(v) => out.extend(v.iter().map(|i| *i as f64)),
            ArrayData::Float(v) => out.extend_from_slice(v),
            ArrayData::Str(_) => {
                return Err(TrackerError::NonNumeric {
                    value: datum.to_string(),
                });
            }
        },
    }
    Ok(())
}

impl Tracker for ContinuousTracker {
    /// Adds every numeric element of `datum`.
    ///
    /// The datum is validated before anything is recorded: if it contains a
    /// string the tracker is left unchanged.
    fn add(&mut self, datum: &Value) -> Result<(), TrackerError> {
        let mut values = Vec::with_capacity(datum.num_elements());
        collect_numbers(datum, &mut values)?;
        for value in values {
            self.add_value(value);
        }
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
        self.min_value = f64::INFINITY;
        self.max_value = f64::NEG_INFINITY;
        self.window.clear();
    }

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        self.ensure_non_empty(Statistic::Statistics)?;
        let mut stats = Statistics::new();
        stats.insert("count", Number::count(self.count));
        stats.insert("sum", self.sum()?);
        stats.insert("mean", self.mean()?);
        stats.insert("median", self.median()?);
        stats.insert("max", self.max()?);
        stats.insert("min", self.min()?);
        stats.insert("std", self.std()?);
        for (point, value) in self.quantiles()? {
            stats.insert(format!("quantile {point:.3}"), value);
        }
        Ok(stats)
    }

    fn state_dict(&self) -> TrackerState {
        TrackerState::Continuous(self.state())
    }

    fn load_state_dict(&mut self, state: TrackerState) -> Result<(), TrackerError> {
        match state {
            TrackerState::Continuous(state) => self.load_state(state),
            TrackerState::Empty => {
                self.reset();
                Ok(())
            }
            other => Err(TrackerError::StateMismatch {
                expected: TrackerKind::Continuous,
                found: other.kind().unwrap_or(TrackerKind::Continuous),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{reducer::BasicReducer, value::ArrayValue};

    fn tracker(max_size: usize) -> ContinuousTracker {
        let config = TrackerConfig::default().with_max_size(max_size).unwrap();
        ContinuousTracker::with_reducer(&config, &BasicReducer)
    }

    fn assert_all_empty(tracker: &ContinuousTracker) {
        assert_eq!(tracker.count(), 0);
        assert!(tracker.is_empty());
        assert_eq!(tracker.sum().unwrap_err().statistic, Statistic::Sum);
        assert_eq!(tracker.mean().unwrap_err().statistic, Statistic::Mean);
        assert_eq!(tracker.max().unwrap_err().statistic, Statistic::Maximum);
        assert_eq!(tracker.min().unwrap_err().statistic, Statistic::Minimum);
        assert_eq!(tracker.median().unwrap_err().statistic, Statistic::Median);
        assert_eq!(tracker.std().unwrap_err().statistic, Statistic::StdDev);
        assert_eq!(tracker.quantiles().unwrap_err().statistic, Statistic::Quantiles);
        assert!(matches!(tracker.statistics(), Err(TrackerError::Empty(_))));
        assert!(tracker.summary().is_err());
    }

    #[test]
    fn test_empty() {
        assert_all_empty(&ContinuousTracker::new());
    }

    #[test]
    fn test_reset() {
        let mut tracker = tracker(10);
        tracker.add(&Value::from(vec![1, 2, 3])).unwrap();
        tracker.reset();
        assert_all_empty(&tracker);
        tracker.reset();
        assert_all_empty(&tracker);
        tracker.add(&Value::from(7)).unwrap();
        assert_eq!(tracker.max().unwrap(), 7.0);
        assert_eq!(tracker.min().unwrap(), 7.0);
    }

    #[test]
    fn test_add_flattens_nested_and_arrays() {
        let mut tracker = tracker(10);
        tracker
            .add(&Value::from(vec![
                Value::from(1),
                Value::from(vec![2.5, 3.5]),
                Value::from(ArrayValue::new(vec![2, 1], vec![4_i64, 5]).unwrap()),
            ]))
            .unwrap();
        assert_eq!(tracker.count(), 5);
        assert_eq!(tracker.sum().unwrap(), 16.0);
        assert_eq!(tracker.window_values(), vec![1.0, 2.5, 3.5, 4.0, 5.0]);
    }

    #[test]
    fn test_add_empty_container_is_noop() {
        let mut tracker = tracker(10);
        tracker.add(&Value::Seq(vec![])).unwrap();
        tracker
            .add(&Value::from(ArrayValue::vector(Vec::<f64>::new())))
            .unwrap();
        assert_all_empty(&tracker);
    }

    #[test]
    fn test_string_rejected_without_side_effects() {
        let mut tracker = tracker(10);
        tracker.add(&Value::from(1)).unwrap();
        let err = tracker
            .add(&Value::from(vec![Value::from(2), Value::from("meow")]))
            .unwrap_err();
        assert!(matches!(err, TrackerError::NonNumeric { .. }));
        assert_eq!(tracker.count(), 1);
        assert_eq!(tracker.sum().unwrap(), 1.0);
    }

    #[test]
    fn test_booleans_count_as_numbers() {
        let mut tracker = tracker(10);
        tracker.add(&Value::from(vec![true, false, true])).unwrap();
        assert_eq!(tracker.sum().unwrap(), 2.0);
    }

    #[test]
    fn test_statistics_keys() {
        let mut tracker = tracker(10);
        tracker.add(&Value::from((0..21).collect::<Vec<i32>>())).unwrap();
        let stats = tracker.statistics().unwrap();
        let keys = stats.keys().collect::<Vec<_>>();
        assert_eq!(
            keys[..7],
            ["count", "sum", "mean", "median", "max", "min", "std"]
        );
        assert_eq!(keys[7], "quantile 0.000");
        assert_eq!(keys[8], "quantile 0.100");
        assert_eq!(keys.len(), 7 + 11);
        assert_eq!(stats.get("count"), Some(Number::Int(21)));
        assert_eq!(stats.get("sum"), Some(Number::Float(210.0)));
    }

    #[test]
    fn test_statistics_without_quantiles() {
        let config = TrackerConfig::new(10, vec![]).unwrap();
        let mut tracker = ContinuousTracker::with_config(&config);
        tracker.add(&Value::from(vec![1, 2])).unwrap();
        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.len(), 7);
        assert!(stats.keys().all(|k| !k.starts_with("quantile")));
    }

    #[test]
    fn test_quantiles_over_range() {
        let config = TrackerConfig::new(100, vec![0.1, 0.5, 0.9]).unwrap();
        let mut tracker = ContinuousTracker::with_reducer(&config, &BasicReducer);
        tracker.add(&Value::from((0..21).collect::<Vec<i32>>())).unwrap();
        assert_eq!(
            tracker.quantiles().unwrap(),
            vec![(0.1, 2.0), (0.5, 10.0), (0.9, 18.0)]
        );
    }

    #[test]
    fn test_single_value_std_is_nan() {
        let mut tracker = tracker(10);
        tracker.add(&Value::from(4.2)).unwrap();
        assert!(tracker.std().unwrap().is_nan());
        assert!(tracker.statistics().unwrap().get("std").unwrap().as_f64().is_nan());
    }

    #[test]
    fn test_window_bound() {
        let mut tracker = tracker(4);
        for v in 1..=10 {
            tracker.add(&Value::from(v)).unwrap();
        }
        assert_eq!(tracker.count(), 10);
        assert_eq!(tracker.sum().unwrap(), 55.0);
        assert_eq!(tracker.min().unwrap(), 1.0);
        assert_eq!(tracker.max().unwrap(), 10.0);
        assert_eq!(tracker.mean().unwrap(), 5.5);
        assert_eq!(tracker.window_values(), vec![7.0, 8.0, 9.0, 10.0]);
        assert_eq!(tracker.median().unwrap(), 8.0);
    }

    #[test]
    fn test_state_round_trip() {
        let mut tracker = tracker(5);
        tracker.add(&Value::from(vec![3.0, -1.0, 8.5, 2.0, 0.0, 11.0])).unwrap();
        let mut restored = self::tracker(5);
        restored.load_state_dict(tracker.state_dict()).unwrap();
        assert_eq!(restored.statistics(), tracker.statistics());

        // resuming continues exactly where the snapshot left off
        tracker.add(&Value::from(4)).unwrap();
        restored.add(&Value::from(4)).unwrap();
        assert_eq!(restored.statistics(), tracker.statistics());
    }

    #[test]
    fn test_infinite_values_json_round_trip() {
        let mut tracker = tracker(3);
        tracker
            .add(&Value::from(vec![f64::NEG_INFINITY, 2.0, f64::INFINITY]))
            .unwrap();
        let json = serde_json::to_string(&tracker.state_dict()).unwrap();
        let mut restored = self::tracker(3);
        restored
            .load_state_dict(serde_json::from_str(&json).unwrap())
            .unwrap();
        assert_eq!(restored.min().unwrap(), f64::NEG_INFINITY);
        assert_eq!(restored.max().unwrap(), f64::INFINITY);
        assert!(restored.sum().unwrap().is_nan());
        assert_eq!(
            restored.window_values(),
            vec![f64::NEG_INFINITY, 2.0, f64::INFINITY]
        );
    }

    #[test]
    fn test_load_invalid_state() {
        let mut tracker = tracker(5);
        let err = tracker
            .load_state_dict(TrackerState::Continuous(ContinuousState {
                count: 1,
                sum: 3.0,
                min_value: 1.0,
                max_value: 2.0,
                values: vec![1.0, 2.0],
            }))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidState { .. }));

        let err = tracker
            .load_state_dict(TrackerState::Discrete(crate::tracker::DiscreteState {
                total: 0,
                counter: vec![],
            }))
            .unwrap_err();
        assert_eq!(
            err,
            TrackerError::StateMismatch {
                expected: TrackerKind::Continuous,
                found: TrackerKind::Discrete,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_sum_and_count_exact(
            chunks in prop::collection::vec(prop::collection::vec(-1000_i32..1000, 0..20), 0..20),
            max_size in 1_usize..16,
        ) {
            let mut tracker = tracker(max_size);
            for chunk in &chunks {
                tracker.add(&Value::from(chunk.clone())).unwrap();
            }
            let all = chunks.iter().flatten().copied().collect::<Vec<_>>();
            prop_assert_eq!(tracker.count(), all.len() as u64);
            if all.is_empty() {
                prop_assert!(tracker.sum().is_err());
            } else {
                let sum = all.iter().map(|&v| i64::from(v)).sum::<i64>();
                prop_assert_eq!(tracker.sum().unwrap(), sum as f64);
                prop_assert_eq!(tracker.min().unwrap(), f64::from(*all.iter().min().unwrap()));
                prop_assert_eq!(tracker.max().unwrap(), f64::from(*all.iter().max().unwrap()));
                let start = all.len().saturating_sub(max_size);
                let recent = all[start..].iter().map(|&v| f64::from(v)).collect::<Vec<_>>();
                prop_assert_eq!(tracker.window_values(), recent);
            }
        }

        #[test]
        fn prop_json_state_round_trip(
            quarters in prop::collection::vec(-400_i32..400, 0..40),
            max_size in 1_usize..8,
            next in -400_i32..400,
        ) {
            let mut tracker = tracker(max_size);
            for q in &quarters {
                tracker.add(&Value::from(f64::from(*q) / 4.0)).unwrap();
            }
            let json = serde_json::to_string(&tracker.state_dict()).unwrap();
            let mut restored = self::tracker(max_size);
            restored.load_state_dict(serde_json::from_str(&json).unwrap()).unwrap();
            prop_assert_eq!(restored.state_dict(), tracker.state_dict());
            prop_assert_eq!(restored.statistics(), tracker.statistics());

            let next = Value::from(f64::from(next) / 4.0);
            tracker.add(&next).unwrap();
            restored.add(&next).unwrap();
            prop_assert_eq!(restored.state_dict(), tracker.state_dict());
            prop_assert_eq!(restored.statistics(), tracker.statistics());
        }
    }
}
