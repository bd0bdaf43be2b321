use crate::backend::error::BackendError;
use crate::models::{EnvironmentSample, PredictionResult};

pub(crate) mod client;
pub use client::BackendClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Read-only view of the monitoring backend.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Environment readings for the last `days` days, one series per metric.
    async fn environmental_data(&self, days: u32) -> Result<EnvironmentSample, BackendError>;

    /// The current pest/disease risk prediction.
    async fn prediction(&self) -> Result<PredictionResult, BackendError>;
}
