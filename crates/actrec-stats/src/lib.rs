//! Online summary statistics for action-recognition data
//!
//! This crate accumulates descriptive statistics over streams of values that
//! are too large to keep in memory, such as the labels, clip lengths and
//! per-frame features of an action-recognition dataset read one sample at a
//! time.
//!
//! # Overview
//!
//! 1. **Values** ([`value::Value`]): Scalars, nested sequences and shaped
//!    arrays, all flattened into their elements when tracked
//! 2. **Trackers** ([`tracker::Tracker`]): Incremental accumulators
//!    - [`tracker::ContinuousTracker`] for numeric streams
//!    - [`tracker::DiscreteTracker`] for categorical streams
//!    - [`tracker::AutoTracker`] choosing between them from the first datum
//!    - [`tracker::SequenceTracker`] for sequence lengths and elements
//! 3. **Statistics** ([`statistics::Statistics`]): Ordered name to number
//!    mapping returned by every tracker
//! 4. **Reducers** ([`reducer::Reducer`]): Statistical reductions over a batch
//!    of numbers, with interchangeable backends selected at runtime
//! 5. **Configuration** ([`config::TrackerConfig`]): Window size and quantile
//!    points, plus [`config::TrackerMode`] to build a tracker by name
//!
//! Tracker state can be captured with [`tracker::Tracker::state_dict`] and
//! restored later, so long-running accumulation can be checkpointed.
//!
//! # Examples
//!
//! ```
//! use actrec_stats::{
//!     config::{TrackerConfig, TrackerMode},
//!     number::Number,
//!     value::Value,
//! };
//!
//! let config = TrackerConfig::default();
//! let mut tracker = config.build(TrackerMode::Auto);
//! tracker.add(&Value::from(vec![0.5, 1.5, 2.5])).unwrap();
//! tracker.add(&Value::from(3.5)).unwrap();
//!
//! let stats = tracker.statistics().unwrap();
//! assert_eq!(stats.get("count"), Some(Number::Int(4)));
//! assert_eq!(stats.get("sum"), Some(Number::Float(8.0)));
//! ```

pub mod config;
pub mod error;
pub mod number;
pub mod reducer;
pub mod statistics;
pub mod tracker;
pub mod value;
pub mod window;
