//! API models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Create-deployment request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub force_build: bool,
}

impl CreateDeploymentRequest {
    /// Request that rebuilds the app even when nothing changed upstream
    pub fn force_build() -> Self {
        Self { force_build: true }
    }
}

/// One page of the deployments listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentsPage {
    #[serde(default)]
    pub deployments: Vec<DeploymentSummary>,
}

/// Deployment entry as it appears in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub id: String,

    #[serde(default)]
    pub phase: Option<String>,

    #[serde(default)]
    pub cause: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Envelope around a single deployment detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentEnvelope {
    pub deployment: DeploymentRecord,
}

/// Full deployment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: String,

    /// Lifecycle phase, e.g. `PENDING_BUILD`, `BUILDING`, `ACTIVE`
    pub phase: String,

    #[serde(default)]
    pub cause: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Error body the API returns in place of a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Error identifier, e.g. `unauthorized`, `invalid_argument`
    pub id: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub request_id: Option<String>,
}

/// Either a deployment detail or a bare API error body.
///
/// The detail endpoint answers with `{"deployment": {...}}` on success and a
/// top-level `{"id": ..., "message": ...}` error body otherwise; callers
/// must check which shape they got before reading a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailResponse {
    Deployment(DeploymentEnvelope),
    Error(ApiErrorBody),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_response_deployment_shape() {
        let raw = r#"{"deployment":{"id":"d1","phase":"BUILDING"}}"#;
        let parsed: DetailResponse = serde_json::from_str(raw).unwrap();
        match parsed {
            DetailResponse::Deployment(envelope) => {
                assert_eq!(envelope.deployment.id, "d1");
                assert_eq!(envelope.deployment.phase, "BUILDING");
            }
            DetailResponse::Error(_) => panic!("expected deployment shape"),
        }
    }

    #[test]
    fn test_detail_response_error_shape() {
        let raw = r#"{"id":"Unauthorized","message":"Unable to authenticate you"}"#;
        let parsed: DetailResponse = serde_json::from_str(raw).unwrap();
        match parsed {
            DetailResponse::Error(body) => {
                assert_eq!(body.id, "Unauthorized");
                assert_eq!(body.message.as_deref(), Some("Unable to authenticate you"));
            }
            DetailResponse::Deployment(_) => panic!("expected error shape"),
        }
    }

    #[test]
    fn test_deployments_page_defaults_to_empty() {
        let page: DeploymentsPage = serde_json::from_str("{}").unwrap();
        assert!(page.deployments.is_empty());
    }

    #[test]
    fn test_create_deployment_request_body() {
        let body = serde_json::to_value(CreateDeploymentRequest::force_build()).unwrap();
        assert_eq!(body, serde_json::json!({"force_build": true}));
    }
}
