//! Proxy request handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use do_api::models::CreateDeploymentRequest;

use crate::server::state::ProxyState;
use crate::utils::version_info;

/// Error body returned by the proxy
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// How the proxied response's status code is chosen
enum PassthroughStatus {
    /// Mirror the upstream status
    Upstream,

    /// Always answer 200; the body carries any upstream error identifier
    AlwaysOk,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { message })).into_response()
}

async fn passthrough(
    result: Result<reqwest::Response, reqwest::Error>,
    mode: PassthroughStatus,
) -> Response {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("upstream request failed: {e}");
            return error_response(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    let upstream_status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => {
            let status = match mode {
                PassthroughStatus::Upstream => upstream_status,
                PassthroughStatus::AlwaysOk => StatusCode::OK,
            };
            (status, Json(body)).into_response()
        }
        Err(e) => {
            error!("upstream response unreadable: {e}");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Initiate a deployment: POST passthrough to the platform.
///
/// The upstream status is mirrored so the control's "succeeded iff 200"
/// check sees upstream rejections as failed initiations.
pub async fn initiate_handler(State(state): State<Arc<ProxyState>>) -> Response {
    let credentials = match state.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let url = state.deployments_url(&credentials.app_id);
    debug!("POST {}", url);

    let result = state
        .client
        .post(&url)
        .bearer_auth(credentials.token.expose_secret())
        .json(&CreateDeploymentRequest::force_build())
        .send()
        .await;

    passthrough(result, PassthroughStatus::Upstream).await
}

/// Query for the status check
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub id: Option<String>,
}

/// Check deployment status: GET passthrough to the platform.
///
/// Without `id`, asks for the single most recent deployment; with `id`, for
/// that deployment's detail. Bodies pass through with status 200 so API
/// error identifiers reach the control intact.
pub async fn check_handler(
    State(state): State<Arc<ProxyState>>,
    Query(query): Query<CheckQuery>,
) -> Response {
    let credentials = match state.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let collection = state.deployments_url(&credentials.app_id);
    let url = match &query.id {
        None => format!("{}?page=1&per_page=1", collection),
        Some(id) => format!("{}/{}", collection, id),
    };
    debug!("GET {}", url);

    let result = state
        .client
        .get(&url)
        .bearer_auth(credentials.token.expose_secret())
        .send()
        .await;

    passthrough(result, PassthroughStatus::AlwaysOk).await
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "redeployer".to_string(),
        version: version.version,
    })
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}
