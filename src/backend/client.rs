//! Orchard Backend Client
//!
//! Reads environment data and risk predictions over HTTP/JSON.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::{endpoints, sync};
use crate::environment::Environment;
use crate::models::{EnvironmentSample, PredictionResult};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("orchard-dash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    environment: Environment,
}

impl BackendClient {
    pub fn new(environment: Environment) -> Result<Self, BackendError> {
        let client = ClientBuilder::new()
            .connect_timeout(sync::request_timeout())
            .timeout(sync::request_timeout())
            .build()?;
        Ok(Self {
            client,
            environment,
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.backend_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        decode_payload(&response_bytes)
    }
}

/// Decodes a JSON body, surfacing the backend's `{"error": "..."}` convention
/// as [`BackendError::Api`] instead of a shape mismatch.
pub(crate) fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BackendError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(BackendError::Api(message.to_string()));
    }
    serde_json::from_value(value).map_err(BackendError::Decode)
}

#[async_trait::async_trait]
impl Backend for BackendClient {
    async fn environmental_data(&self, days: u32) -> Result<EnvironmentSample, BackendError> {
        self.get_request(endpoints::ENVIRONMENTAL_DATA, &[("days", days.to_string())])
            .await
    }

    async fn prediction(&self) -> Result<PredictionResult, BackendError> {
        self.get_request(endpoints::PREDICTIONS, &[]).await
    }
}

#[cfg(test)]
/// These are ignored by default since they require a live backend to run.
mod live_backend_tests {
    use crate::backend::Backend;
    use crate::environment::Environment;

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should return the environment series for the last week.
    async fn test_environmental_data() {
        let client = super::BackendClient::new(Environment::Local).unwrap();
        match client.environmental_data(7).await {
            Ok(sample) => println!("Got {} temperature readings", sample.temperature.len()),
            Err(e) => panic!("Failed to get environmental data: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live backend instance.
    /// Should return the current risk prediction.
    async fn test_prediction() {
        let client = super::BackendClient::new(Environment::Local).unwrap();
        match client.prediction().await {
            Ok(prediction) => println!("Risk level: {}", prediction.risk_level),
            Err(e) => panic!("Failed to get prediction: {}", e),
        }
    }
}
