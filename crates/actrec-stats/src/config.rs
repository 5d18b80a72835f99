//! Tracker construction parameters.
//!
//! [`TrackerConfig`] is validated when it is built (or deserialized), so a bad
//! window size or quantile point is reported before any data is tracked.
//!
//! ```
//! use actrec_stats::config::{TrackerConfig, TrackerMode};
//!
//! let config: TrackerConfig =
//!     serde_json::from_str(r#"{"max_size": 100, "quantiles": [0.9, 0.5]}"#).unwrap();
//! assert_eq!(config.max_size(), 100);
//! assert_eq!(config.quantiles(), &[0.5, 0.9]);
//!
//! assert!(serde_json::from_str::<TrackerConfig>(r#"{"max_size": 0}"#).is_err());
//!
//! let mut tracker = config.build(TrackerMode::Auto);
//! tracker.add(&1.5.into()).unwrap();
//! assert_eq!(tracker.count(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    reducer::{self, Reducer},
    tracker::{
        AutoTracker, ContinuousTracker, DiscreteTracker, NoOpTracker, SequenceTracker, Tracker,
    },
};

/// Default capacity of a continuous tracker's window.
pub const DEFAULT_MAX_SIZE: usize = 10_000;

/// The default quantile points `0.0, 0.1, ..., 1.0`.
#[must_use]
pub fn default_quantiles() -> Vec<f64> {
    (0..=10).map(|i| f64::from(i) / 10.0).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrackerConfig")]
pub struct TrackerConfig {
    max_size: usize,
    quantiles: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTrackerConfig {
    max_size: usize,
    quantiles: Vec<f64>,
}

impl Default for RawTrackerConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            quantiles: default_quantiles(),
        }
    }
}

impl TryFrom<RawTrackerConfig> for TrackerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawTrackerConfig) -> Result<Self, Self::Error> {
        Self::new(raw.max_size, raw.quantiles)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            quantiles: default_quantiles(),
        }
    }
}

impl TrackerConfig {
    /// Validates and builds a configuration.
    ///
    /// # Arguments
    ///
    /// * `max_size` - Number of most recent values a continuous tracker keeps
    /// * `quantiles` - Probability points reported as `quantile_{p}`
    ///
    /// # Returns
    ///
    /// The configuration with `quantiles` sorted in ascending order, or
    /// [`ConfigError`] if `max_size` is zero or a point lies outside `[0, 1]`.
    pub fn new(max_size: usize, mut quantiles: Vec<f64>) -> Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if let Some(&point) = quantiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ConfigError::InvalidQuantile { point });
        }
        quantiles.sort_by(f64::total_cmp);
        Ok(Self {
            max_size,
            quantiles,
        })
    }

    pub fn with_max_size(self, max_size: usize) -> Result<Self, ConfigError> {
        Self::new(max_size, self.quantiles)
    }

    pub fn with_quantiles(self, quantiles: Vec<f64>) -> Result<Self, ConfigError> {
        Self::new(self.max_size, quantiles)
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn quantiles(&self) -> &[f64] {
        &self.quantiles
    }

    /// Builds a tracker for `mode` using the automatically selected reducer.
    #[must_use]
    pub fn build(&self, mode: TrackerMode) -> Box<dyn Tracker> {
        self.build_with_reducer(mode, reducer::auto_reducer())
    }

    #[must_use]
    pub fn build_with_reducer(
        &self,
        mode: TrackerMode,
        reducer: &'static dyn Reducer,
    ) -> Box<dyn Tracker> {
        match mode {
            TrackerMode::Auto => Box::new(AutoTracker::with_reducer(self.clone(), reducer)),
            TrackerMode::Continuous => Box::new(ContinuousTracker::with_reducer(self, reducer)),
            TrackerMode::Discrete => Box::new(DiscreteTracker::new()),
            TrackerMode::Sequence => Box::new(SequenceTracker::with_values(
                AutoTracker::with_reducer(self.clone(), reducer),
                ContinuousTracker::with_reducer(self, reducer),
            )),
            TrackerMode::Disabled => Box::new(NoOpTracker),
        }
    }
}

/// Which tracker [`TrackerConfig::build`] creates.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum TrackerMode {
    /// Choose continuous or discrete tracking from the first datum
    #[default]
    #[display("auto")]
    Auto,
    #[display("continuous")]
    Continuous,
    #[display("discrete")]
    Discrete,
    /// Track sequence lengths alongside their elements
    #[display("sequence")]
    Sequence,
    /// Track nothing
    #[display("disabled")]
    Disabled,
}
