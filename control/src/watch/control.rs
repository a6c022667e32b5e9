//! Deploy control: trigger a deployment and watch it settle

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::ControlError;
use crate::http::deployments::DeployGatewayExt;
use crate::notify::bundle::NotificationSink;
use crate::notify::status::{bundle_for, StatusEvent};
use crate::options::ControlOptions;
use crate::watch::session::{PollingSession, SessionEvent};
use crate::watch::watcher::{self, SessionEnd};

/// Label hosts put on the trigger control
pub const TRIGGER_LABEL: &str = "Deploy";

/// User confirmation step, supplied by the host
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Present the message; returning true proceeds with the deploy
    async fn confirm(&self, message: &str) -> bool;
}

/// Gate that never asks
#[derive(Debug, Default)]
pub struct AutoConfirm;

#[async_trait]
impl ConfirmationGate for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Handle on a running watch session.
///
/// Owns the session's task; dropping or disposing it cancels the pending
/// first-check sleep and the recurring interval in whatever state the
/// session is in. An in-flight request is not waited for.
#[derive(Debug)]
pub struct Watcher {
    handle: JoinHandle<SessionEnd>,
}

impl Watcher {
    /// Cancel the session's timers
    pub fn dispose(self) {
        self.handle.abort();
    }

    /// Whether the session has reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the session to settle
    pub async fn settled(mut self) -> Result<SessionEnd, ControlError> {
        (&mut self.handle)
            .await
            .map_err(|e| ControlError::Internal(format!("watch task failed: {e}")))
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// What a trigger call produced
#[derive(Debug)]
pub enum TriggerOutcome {
    /// The user declined the confirmation prompt; nothing happened
    NotConfirmed,

    /// The initiation request did not come back 200; no polling started
    InitiationFailed,

    /// A watch session is running
    Watching(Watcher),
}

/// The deploy control: initiates a deployment and watches it settle.
///
/// Each trigger runs an independent session; triggering again while one is
/// in flight starts a second session rather than touching the first.
pub struct DeployControl<G, N>
where
    G: DeployGatewayExt + ?Sized + 'static,
    N: NotificationSink + ?Sized + 'static,
{
    gateway: Arc<G>,
    sink: Arc<N>,
    gate: Arc<dyn ConfirmationGate>,
    options: ControlOptions,
}

impl<G, N> DeployControl<G, N>
where
    G: DeployGatewayExt + ?Sized + 'static,
    N: NotificationSink + ?Sized + 'static,
{
    /// Create a control with an auto-confirming gate
    pub fn new(gateway: Arc<G>, sink: Arc<N>, options: ControlOptions) -> Self {
        Self {
            gateway,
            sink,
            gate: Arc::new(AutoConfirm),
            options,
        }
    }

    /// Replace the confirmation gate
    pub fn with_gate(mut self, gate: Arc<dyn ConfirmationGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Options in effect
    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    /// Trigger a deployment and start watching it
    pub async fn trigger(&self) -> Result<TriggerOutcome, ControlError> {
        let mut session = PollingSession::new();

        if let Some(message) = self.options.confirmation.message() {
            if !self.gate.confirm(message).await {
                info!("deployment not confirmed");
                return Ok(TriggerOutcome::NotConfirmed);
            }
        }

        session.process(SessionEvent::Trigger)?;

        if !self.options.suppress_toasts {
            self.sink
                .push(bundle_for(StatusEvent::InitiationStarted, &self.options));
        }

        let initiated = match self.gateway.initiate().await {
            Ok(outcome) if outcome.succeeded => true,
            Ok(outcome) => {
                warn!("initiation answered {}", outcome.status);
                false
            }
            Err(e) => {
                warn!("initiation failed: {e}");
                false
            }
        };

        if !initiated {
            session.process(SessionEvent::InitiateFailed)?;
            if !self.options.suppress_toasts {
                self.sink
                    .push(bundle_for(StatusEvent::InitiationFailed, &self.options));
            }
            return Ok(TriggerOutcome::InitiationFailed);
        }

        session.process(SessionEvent::InitiateOk)?;

        let handle = tokio::spawn(watcher::run(
            self.options.clone(),
            session,
            self.gateway.clone(),
            self.sink.clone(),
        ));

        Ok(TriggerOutcome::Watching(Watcher { handle }))
    }
}
