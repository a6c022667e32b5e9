//! Deployment operations against the proxy

use async_trait::async_trait;
use http::StatusCode;
use tracing::debug;

use do_api::models::{DeploymentSummary, DeploymentsPage, DetailResponse};

use crate::errors::ControlError;
use crate::http::client::DeployGateway;
use crate::models::deployment::DeploymentHandle;

/// Result of an initiation request
#[derive(Debug, Clone)]
pub struct InitiateOutcome {
    /// Whether the proxy answered 200
    pub succeeded: bool,

    /// Raw status code
    pub status: StatusCode,

    /// Response body, if any
    pub body: String,
}

/// Gateway operations, as a trait so the watch loop can run against a mock
#[async_trait]
pub trait DeployGatewayExt: Send + Sync {
    /// Kick off a new deployment
    async fn initiate(&self) -> Result<InitiateOutcome, ControlError>;

    /// Most recent deployment, if any exist
    async fn latest_deployment(&self) -> Result<Option<DeploymentSummary>, ControlError>;

    /// Full detail for one deployment
    async fn deployment_detail(
        &self,
        handle: &DeploymentHandle,
    ) -> Result<DetailResponse, ControlError>;
}

#[async_trait]
impl DeployGatewayExt for DeployGateway {
    async fn initiate(&self) -> Result<InitiateOutcome, ControlError> {
        debug!("POST {}", self.endpoint());

        let response = self.client().post(self.endpoint()).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(InitiateOutcome {
            succeeded: status == StatusCode::OK,
            status,
            body,
        })
    }

    async fn latest_deployment(&self) -> Result<Option<DeploymentSummary>, ControlError> {
        debug!("GET {}", self.endpoint());

        let response = self.client().get(self.endpoint()).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ControlError::GatewayError(format!("{}: {}", status, body)));
        }

        let page: DeploymentsPage = response.json().await?;
        Ok(page.deployments.into_iter().next())
    }

    async fn deployment_detail(
        &self,
        handle: &DeploymentHandle,
    ) -> Result<DetailResponse, ControlError> {
        let url = format!("{}?id={}", self.endpoint(), handle);
        debug!("GET {}", url);

        let response = self.client().get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ControlError::GatewayError(format!("{}: {}", status, body)));
        }

        let detail = response.json().await?;
        Ok(detail)
    }
}
