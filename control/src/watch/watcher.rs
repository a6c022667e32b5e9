//! Watch loop for one deployment session

use std::sync::Arc;

use tracing::{debug, error, info};

use do_api::models::DetailResponse;

use crate::errors::ControlError;
use crate::http::deployments::DeployGatewayExt;
use crate::models::deployment::{DeploymentHandle, DeploymentPhase, ErrorSentinel};
use crate::notify::bundle::NotificationSink;
use crate::notify::status::{bundle_for, StatusEvent};
use crate::options::ControlOptions;
use crate::watch::session::{PollingSession, SessionEvent};

/// Why a session reached its terminal state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEnd {
    /// A terminal phase was observed
    Settled(DeploymentPhase),

    /// The API answered with an error identifier
    Denied(ErrorSentinel),
}

/// What one tick decided
#[derive(Debug)]
pub(crate) enum TickOutcome {
    /// Keep polling
    Continue,

    /// Stop, the session has settled
    Finished(SessionEnd),
}

/// Run the watch loop for one session until a terminal status is observed.
///
/// Ticks are serialized: each one is awaited before the next interval
/// starts, so a slow response delays the cadence instead of overlapping it.
/// Aborting the task cancels whichever sleep is pending.
pub async fn run<G, N>(
    options: ControlOptions,
    mut session: PollingSession,
    gateway: Arc<G>,
    sink: Arc<N>,
) -> SessionEnd
where
    G: DeployGatewayExt + ?Sized,
    N: NotificationSink + ?Sized,
{
    // Give the platform a chance to register the new deployment; checking
    // too fast can pick up the previous one.
    tokio::time::sleep(options.first_check_delay).await;

    if let Err(e) = session.process(SessionEvent::FirstCheckDue) {
        error!("session error: {e}");
    }

    loop {
        match tick(&mut session, gateway.as_ref(), sink.as_ref(), &options).await {
            Ok(TickOutcome::Finished(end)) => {
                info!("deployment watch finished: {:?}", end);
                return end;
            }
            Ok(TickOutcome::Continue) => {}
            Err(e) => {
                // A network hiccup or malformed response skips this tick only.
                error!("deployment status check failed: {e}");
            }
        }

        tokio::time::sleep(options.check_interval).await;
    }
}

/// One status check.
///
/// Discovers the session handle from the listing when it is not yet known,
/// then reads the deployment detail and interprets it.
pub(crate) async fn tick<G, N>(
    session: &mut PollingSession,
    gateway: &G,
    sink: &N,
    options: &ControlOptions,
) -> Result<TickOutcome, ControlError>
where
    G: DeployGatewayExt + ?Sized,
    N: NotificationSink + ?Sized,
{
    if session.handle().is_none() {
        match gateway.latest_deployment().await? {
            Some(summary) => {
                debug!("following deployment {}", summary.id);
                session.process(SessionEvent::HandleDiscovered(DeploymentHandle::new(
                    summary.id,
                )))?;
            }
            None => {
                // Nothing listed yet; retry discovery on the next tick.
                debug!("no deployments listed yet");
                return Ok(TickOutcome::Continue);
            }
        }
    }

    let Some(handle) = session.handle() else {
        return Ok(TickOutcome::Continue);
    };

    match gateway.deployment_detail(handle).await? {
        DetailResponse::Error(body) => match ErrorSentinel::from_id(&body.id) {
            Some(sentinel) => {
                if !options.suppress_toasts {
                    sink.push(bundle_for(StatusEvent::Denied(sentinel), options));
                }
                session.process(SessionEvent::TerminalObserved)?;
                Ok(TickOutcome::Finished(SessionEnd::Denied(sentinel)))
            }
            None => Err(ControlError::GatewayError(format!(
                "unexpected API error body: {}",
                body.id
            ))),
        },
        DetailResponse::Deployment(envelope) => {
            let phase = DeploymentPhase::parse(&envelope.deployment.phase);
            if !options.suppress_toasts {
                sink.push(bundle_for(StatusEvent::Phase(&phase), options));
            }
            if phase.is_terminal() {
                session.process(SessionEvent::TerminalObserved)?;
                Ok(TickOutcome::Finished(SessionEnd::Settled(phase)))
            } else {
                Ok(TickOutcome::Continue)
            }
        }
    }
}
