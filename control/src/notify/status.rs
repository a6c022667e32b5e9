//! Status-to-notification mapping

use std::time::Duration;

use crate::models::deployment::{DeploymentPhase, ErrorSentinel};
use crate::notify::bundle::{NotificationBundle, Severity};
use crate::options::ControlOptions;

/// Extra display time granted to the initiation notification past the
/// first-check pause
const INIT_OVERLAP: Duration = Duration::from_millis(500);

/// One observation the control wants the user to see
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent<'a> {
    /// Initiation request is about to be sent
    InitiationStarted,

    /// Initiation came back unsuccessful
    InitiationFailed,

    /// A lifecycle phase was observed
    Phase(&'a DeploymentPhase),

    /// The API answered with an error identifier instead of a deployment
    Denied(ErrorSentinel),
}

/// Map a status observation to its notification.
///
/// Total over everything the gateway can produce: phases outside the
/// interpreted set get the generic in-progress treatment.
pub fn bundle_for(event: StatusEvent<'_>, options: &ControlOptions) -> NotificationBundle {
    match event {
        StatusEvent::InitiationStarted => NotificationBundle {
            title: "Deployment: initializing".to_string(),
            severity: Severity::Info,
            duration: options.first_check_delay + INIT_OVERLAP,
            dismissible: false,
            description: None,
        },
        StatusEvent::InitiationFailed => NotificationBundle {
            title: "Deployment: failed initialization".to_string(),
            severity: Severity::Error,
            duration: options.settled_duration,
            dismissible: true,
            description: None,
        },
        StatusEvent::Denied(sentinel) => NotificationBundle {
            title: format!("Deployment: {}", sentinel.label()),
            severity: Severity::Error,
            duration: options.settled_duration,
            dismissible: true,
            description: None,
        },
        StatusEvent::Phase(phase) => {
            let severity = match phase {
                DeploymentPhase::Active => Severity::Success,
                DeploymentPhase::Canceled => Severity::Error,
                _ => Severity::Info,
            };
            let terminal = phase.is_terminal();
            NotificationBundle {
                title: format!("Deployment: {}", phase.label()),
                severity,
                duration: if terminal {
                    options.settled_duration
                } else {
                    options.check_interval
                },
                dismissible: terminal,
                description: match phase {
                    DeploymentPhase::Building => options.estimated_duration_message.clone(),
                    _ => None,
                },
            }
        }
    }
}
