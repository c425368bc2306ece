use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::domain::admission::{AdmissionDecision, AdmissionEngine};
use crate::domain::hours::RESERVATION_DURATION;
use crate::domain::registry::AgentRegistry;
use crate::transport::protocol::{AgentMessage, ControllerResponse, ReservationOutcome};

/// Bound of one session's reply channel.
pub const REPLY_BUFFER: usize = 32;

/// How long one receive poll waits before re-checking the stop signal.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The response destination of one agent session.
pub type ReplyHandle = mpsc::Sender<ControllerResponse>;

/// One inbound message together with the destination its response goes to.
#[derive(Debug)]
pub struct Inbound {
    pub message: AgentMessage,
    pub reply: ReplyHandle,
}

/// The concurrent front door: consumes inbound messages one at a time,
/// feeds reservation requests through the admission engine and routes each
/// response back to the originating session.
///
/// The receive loop polls with a bounded timeout so the stop signal is
/// honored within one interval even when no agent is connected; a message
/// already dequeued is always processed to completion. Undeliverable
/// responses are logged and dropped, never fatal.
pub struct RequestDispatcher {
    engine: Arc<AdmissionEngine>,
    registry: Arc<AgentRegistry<ReplyHandle>>,
    inbound: mpsc::Receiver<Inbound>,
    shutdown: CancellationToken,
    poll_interval: Duration,
}

impl RequestDispatcher {
    pub fn new(
        engine: Arc<AdmissionEngine>,
        registry: Arc<AgentRegistry<ReplyHandle>>,
        inbound: mpsc::Receiver<Inbound>,
        shutdown: CancellationToken,
    ) -> RequestDispatcher {
        RequestDispatcher { engine, registry, inbound, shutdown, poll_interval: POLL_INTERVAL }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> RequestDispatcher {
        self.poll_interval = poll_interval;
        self
    }

    pub async fn run(mut self) {
        while !self.shutdown.is_cancelled() {
            match timeout(self.poll_interval, self.inbound.recv()).await {
                // No data within the poll interval is not an error.
                Err(_) => continue,
                Ok(None) => {
                    log::debug!("All sessions closed, dispatcher stopping");
                    break;
                }
                Ok(Some(inbound)) => self.handle(inbound),
            }
        }
        log::info!("Dispatcher stopped, no further requests will be processed");
    }

    fn handle(&self, inbound: Inbound) {
        match inbound.message {
            AgentMessage::Register { agent_name } => {
                if self.registry.register(&agent_name, inbound.reply.clone()) {
                    log::info!("Agent '{}' registered ({} agents total)", agent_name, self.registry.len());
                } else {
                    log::warn!("Agent registry is full, ignoring the join of '{}'", agent_name);
                }

                let current_hour = self.engine.ledger().current_hour();
                let response = ControllerResponse::CurrentHour { current_hour, message: format!("Welcome. Current hour: {}:00", current_hour) };
                self.respond(&agent_name, &inbound.reply, response);
            }
            AgentMessage::ReservationRequest { agent_name, family_name, requested_hour, party_size } => {
                log::info!(
                    "Request from agent '{}': family '{}', hour {}:00, {} people",
                    agent_name,
                    family_name,
                    requested_hour,
                    party_size
                );

                let decision = self.engine.decide(&family_name, &agent_name, requested_hour, party_size);
                let response = self.to_response(&decision, party_size);
                self.respond(&agent_name, &inbound.reply, response);
            }
            AgentMessage::Finished { agent_name } => {
                log::info!("Agent '{}' has finished", agent_name);
            }
        }
    }

    fn to_response(&self, decision: &AdmissionDecision, party_size: i64) -> ControllerResponse {
        let current_hour = self.engine.ledger().current_hour();
        let (outcome, message) = match decision {
            AdmissionDecision::Accepted { hour } => (
                ReservationOutcome::Accepted,
                format!("Reservation APPROVED - Hour: {}:00 - {}:00 for {} people", hour, hour + RESERVATION_DURATION, party_size),
            ),
            AdmissionDecision::Rescheduled { hour } => (
                ReservationOutcome::Rescheduled,
                format!("Reservation RESCHEDULED - New hour: {}:00 - {}:00 for {} people", hour, hour + RESERVATION_DURATION, party_size),
            ),
            AdmissionDecision::Rejected { reason } => (ReservationOutcome::Rejected, reason.clone()),
        };

        ControllerResponse::Reservation { outcome, assigned_hour: decision.assigned_hour(), current_hour, message }
    }

    fn respond(&self, agent_name: &str, reply: &ReplyHandle, response: ControllerResponse) {
        // try_send: a slow or gone destination must never stall the run.
        if let Err(e) = reply.try_send(response) {
            log::warn!("Could not deliver a response to agent '{}': {}", agent_name, e);
        }
    }
}
