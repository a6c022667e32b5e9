//! Proxy server state

use std::time::Duration;

use reqwest::Client;
use secrecy::SecretString;

use crate::errors::ControlError;

/// Credentials for the upstream platform API
#[derive(Debug)]
pub struct Credentials {
    /// Bearer token
    pub token: SecretString,

    /// Application identifier
    pub app_id: String,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// Returns `None` unless both `DO_ACCESS_TOKEN` and `DO_APP_ID` are set;
    /// requests against a credential-less proxy fail with the configuration
    /// error, never with a half-authenticated upstream call.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("DO_ACCESS_TOKEN").ok()?;
        let app_id = std::env::var("DO_APP_ID").ok()?;
        Some(Self {
            token: SecretString::from(token),
            app_id,
        })
    }
}

/// State shared across proxy handlers
pub struct ProxyState {
    /// Upstream platform API base, no trailing slash
    pub upstream_base: String,

    /// Upstream credentials; absence fails requests, not startup
    pub credentials: Option<Credentials>,

    /// Client used to reach the upstream
    pub client: Client,
}

impl ProxyState {
    /// Build the proxy state, validating the upstream base URL
    pub fn new(
        upstream_base: &str,
        credentials: Option<Credentials>,
        request_timeout: Duration,
    ) -> Result<Self, ControlError> {
        url::Url::parse(upstream_base)
            .map_err(|e| ControlError::ConfigError(format!("invalid upstream base: {e}")))?;

        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            upstream_base: upstream_base.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// Credentials, or the configuration error when either half is missing
    pub(crate) fn credentials(&self) -> Result<&Credentials, ControlError> {
        self.credentials
            .as_ref()
            .ok_or(ControlError::MissingCredentials)
    }

    /// Upstream deployments collection URL for the configured app
    pub(crate) fn deployments_url(&self, app_id: &str) -> String {
        format!("{}/apps/{}/deployments", self.upstream_base, app_id)
    }
}
