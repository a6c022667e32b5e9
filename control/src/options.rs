//! Control configuration options

use std::time::Duration;

/// Prompt shown when confirmation is required without a custom message
pub const DEFAULT_CONFIRMATION_MESSAGE: &str =
    "This will redeploy the website with _all_ published content. Proceed?";

/// Confirmation step applied before a deployment is initiated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmationPolicy {
    /// Initiate without asking
    #[default]
    Disabled,

    /// Ask with the default message
    Required,

    /// Ask with a custom message
    RequiredWith(String),
}

impl ConfirmationPolicy {
    /// Message to present, when confirmation is required
    pub fn message(&self) -> Option<&str> {
        match self {
            ConfirmationPolicy::Disabled => None,
            ConfirmationPolicy::Required => Some(DEFAULT_CONFIRMATION_MESSAGE),
            ConfirmationPolicy::RequiredWith(message) => Some(message),
        }
    }
}

/// Options for the deploy control
#[derive(Debug, Clone)]
pub struct ControlOptions {
    /// Lifetime of terminal (success or error) notifications
    pub settled_duration: Duration,

    /// Poll cadence once the first check has run
    pub check_interval: Duration,

    /// Pause between initiation and the first status check
    pub first_check_delay: Duration,

    /// Description attached to the BUILDING notification
    pub estimated_duration_message: Option<String>,

    /// Perform state transitions without pushing notifications
    pub suppress_toasts: bool,

    /// Confirmation step before initiating
    pub confirmation: ConfirmationPolicy,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            settled_duration: Duration::from_millis(600_000), // 10m
            check_interval: Duration::from_secs(30),          // 30s
            first_check_delay: Duration::from_secs(5),        // 5s
            estimated_duration_message: Some("Est. 8 minutes".to_string()),
            suppress_toasts: false,
            confirmation: ConfirmationPolicy::Disabled,
        }
    }
}
