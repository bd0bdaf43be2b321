//! Messages sent from the sync tasks to the dashboard state

use crate::backend::error::BackendError;
use crate::models::{EnvironmentSample, PredictionResult};
use chrono::{DateTime, Local};

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum RefreshTrigger {
    Timer,
    Manual,
}

/// Outcome of one request, tagged with the number it was issued under.
#[derive(Debug)]
pub enum SyncUpdate {
    Environment {
        seq: u64,
        result: Result<EnvironmentSample, BackendError>,
    },
    Prediction {
        seq: u64,
        result: Result<PredictionResult, BackendError>,
    },
    /// A refresh started. Sent before any of its requests resolve.
    Refreshed {
        at: DateTime<Local>,
        trigger: RefreshTrigger,
    },
}
