//! HTTP client for the deploy proxy

use reqwest::Client;

use crate::errors::ControlError;

/// Client for the deploy proxy endpoint.
///
/// Stateless beyond its connection pool: one endpoint, no retries. Retry
/// cadence belongs to the watch loop, not to individual calls.
pub struct DeployGateway {
    client: Client,
    endpoint: String,
}

impl DeployGateway {
    /// Create a gateway against the given proxy endpoint
    pub fn new(endpoint: &str) -> Result<Self, ControlError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// The proxy endpoint this gateway talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
