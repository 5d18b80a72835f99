use super::{Tracker, TrackerState};
use crate::{error::TrackerError, statistics::Statistics, value::Value};

/// Tracker used when tracking is disabled.
///
/// Every call succeeds: `add` discards its input, `count` is zero and
/// `statistics` is an empty mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTracker;

impl Tracker for NoOpTracker {
    fn add(&mut self, _datum: &Value) -> Result<(), TrackerError> {
        Ok(())
    }

    fn count(&self) -> u64 {
        0
    }

    fn reset(&mut self) {}

    fn statistics(&self) -> Result<Statistics, TrackerError> {
        Ok(Statistics::new())
    }

    fn state_dict(&self) -> TrackerState {
        TrackerState::Empty
    }

    fn load_state_dict(&mut self, _state: TrackerState) -> Result<(), TrackerError> {
        Ok(())
    }
}
