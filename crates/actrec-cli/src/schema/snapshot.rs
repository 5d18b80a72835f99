use actrec_stats::{
    config::{TrackerConfig, TrackerMode},
    tracker::TrackerState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracker state saved by `actrec summarize --save-state`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub mode: TrackerMode,
    pub config: TrackerConfig,
    pub state: TrackerState,
}

impl Snapshot {
    pub fn new(mode: TrackerMode, config: TrackerConfig, state: TrackerState) -> Self {
        Self {
            saved_at: Utc::now(),
            mode,
            config,
            state,
        }
    }
}
