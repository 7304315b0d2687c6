//! Simulation service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use simdeck_shared::{parse_simulation_status, SimulationReport, SIMULATION_STATUS_PATH};

use crate::infrastructure::http::{build_client, network_error, normalize_base_url, read_json};
use crate::infrastructure::ports::{BackendError, SimulationPort};

/// Default simulation service URL.
pub const DEFAULT_SIMULATION_URL: &str = "http://localhost:8008";

/// Client for the simulation service's status endpoint
#[derive(Clone)]
pub struct SimulationClient {
    client: Client,
    base_url: String,
}

impl SimulationClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: normalize_base_url(base_url),
        }
    }
}

#[async_trait]
impl SimulationPort for SimulationClient {
    async fn fetch_status(&self) -> Result<Option<SimulationReport>, BackendError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, SIMULATION_STATUS_PATH))
            .send()
            .await
            .map_err(network_error)?;

        let body = read_json(response).await?;
        Ok(parse_simulation_status(body)?)
    }
}
