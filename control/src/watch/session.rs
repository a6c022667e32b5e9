//! Polling session state machine

use crate::errors::ControlError;
use crate::models::deployment::DeploymentHandle;

/// Where one polling session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in flight
    Idle,

    /// Initiation request running
    Initiating,

    /// Waiting out the pause before the first status check
    AwaitingFirstCheck,

    /// Recurring checks armed
    Polling,

    /// No further checks will run
    Terminal,
}

/// Session transition events
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// User triggered a deploy
    Trigger,

    /// Initiation answered 200
    InitiateOk,

    /// Initiation failed or answered non-200
    InitiateFailed,

    /// The pause before the first check elapsed
    FirstCheckDue,

    /// The listing produced a deployment to follow
    HandleDiscovered(DeploymentHandle),

    /// A terminal phase or error sentinel was observed
    TerminalObserved,
}

/// Mutable state owned by one watch session.
///
/// The adopted handle lives here, not in a captured closure variable, so
/// every tick reads and writes the same place.
#[derive(Debug, Clone)]
pub struct PollingSession {
    state: SessionState,
    handle: Option<DeploymentHandle>,
}

impl PollingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            handle: None,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The deployment this session follows, once discovered
    pub fn handle(&self) -> Option<&DeploymentHandle> {
        self.handle.as_ref()
    }

    /// Whether the session has settled
    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Terminal
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: SessionEvent) -> Result<(), ControlError> {
        let new_state = match (self.state, &event) {
            (SessionState::Idle, SessionEvent::Trigger) => SessionState::Initiating,

            (SessionState::Initiating, SessionEvent::InitiateOk) => SessionState::AwaitingFirstCheck,
            (SessionState::Initiating, SessionEvent::InitiateFailed) => SessionState::Terminal,

            (SessionState::AwaitingFirstCheck, SessionEvent::FirstCheckDue) => SessionState::Polling,

            (SessionState::Polling, SessionEvent::HandleDiscovered(handle)) => {
                self.handle = Some(handle.clone());
                SessionState::Polling
            }
            (SessionState::Polling, SessionEvent::TerminalObserved) => SessionState::Terminal,

            (state, event) => {
                return Err(ControlError::SessionError(format!(
                    "invalid transition: {:?} -> {:?}",
                    state, event
                )));
            }
        };

        self.state = new_state;
        Ok(())
    }
}

impl Default for PollingSession {
    fn default() -> Self {
        Self::new()
    }
}
