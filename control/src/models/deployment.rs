//! Deployment domain types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for one deployment, assigned by the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentHandle(String);

impl DeploymentHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase reported by the platform.
///
/// Phases outside the interpreted set are carried through as [`Other`]
/// rather than rejected, so an unexpected phase string degrades to the
/// generic in-progress treatment instead of breaking the watch loop.
///
/// [`Other`]: DeploymentPhase::Other
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentPhase {
    PendingBuild,
    Building,
    PendingDeploy,
    Deploying,
    Active,
    Canceled,
    Superseded,
    Other(String),
}

impl DeploymentPhase {
    /// Parse a wire phase string. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING_BUILD" => DeploymentPhase::PendingBuild,
            "BUILDING" => DeploymentPhase::Building,
            "PENDING_DEPLOY" => DeploymentPhase::PendingDeploy,
            "DEPLOYING" => DeploymentPhase::Deploying,
            "ACTIVE" => DeploymentPhase::Active,
            "CANCELED" => DeploymentPhase::Canceled,
            "SUPERSEDED" => DeploymentPhase::Superseded,
            other => DeploymentPhase::Other(other.to_string()),
        }
    }

    /// Wire representation of the phase
    pub fn as_wire(&self) -> &str {
        match self {
            DeploymentPhase::PendingBuild => "PENDING_BUILD",
            DeploymentPhase::Building => "BUILDING",
            DeploymentPhase::PendingDeploy => "PENDING_DEPLOY",
            DeploymentPhase::Deploying => "DEPLOYING",
            DeploymentPhase::Active => "ACTIVE",
            DeploymentPhase::Canceled => "CANCELED",
            DeploymentPhase::Superseded => "SUPERSEDED",
            DeploymentPhase::Other(raw) => raw,
        }
    }

    /// Human label: the wire name lower-cased with underscores as spaces
    pub fn label(&self) -> String {
        self.as_wire().replace('_', " ").to_lowercase()
    }

    /// Phases after which no further polling is meaningful
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentPhase::Active | DeploymentPhase::Canceled | DeploymentPhase::Superseded
        )
    }
}

/// Error identifiers the API can return in place of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSentinel {
    InvalidArgument,
    Unauthorized,
}

impl ErrorSentinel {
    /// Match an API error identifier against the two known sentinels
    pub fn from_id(id: &str) -> Option<Self> {
        if id.eq_ignore_ascii_case("invalid_argument") {
            Some(ErrorSentinel::InvalidArgument)
        } else if id.eq_ignore_ascii_case("unauthorized") {
            Some(ErrorSentinel::Unauthorized)
        } else {
            None
        }
    }

    /// Human label in the same shape as phase labels
    pub fn label(&self) -> &'static str {
        match self {
            ErrorSentinel::InvalidArgument => "invalid argument",
            ErrorSentinel::Unauthorized => "unauthorized",
        }
    }
}
