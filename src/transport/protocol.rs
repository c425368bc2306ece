use serde::{Deserialize, Serialize};

/// Messages an agent sends to the controller.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum AgentMessage {
    /// Initial handshake: "Hi, I am agent X".
    Register { agent_name: String },
    /// One reservation request for a named family.
    ReservationRequest { agent_name: String, family_name: String, requested_hour: i64, party_size: i64 },
    /// The agent has no more requests. No response is expected.
    Finished { agent_name: String },
}

/// Business outcome of a reservation request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationOutcome {
    Accepted,
    Rescheduled,
    Rejected,
}

/// Responses the controller sends back to an agent.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum ControllerResponse {
    /// Answer to `Register`.
    CurrentHour { current_hour: i64, message: String },
    /// Answer to `ReservationRequest`. `assigned_hour` is set iff the
    /// outcome is `Accepted` or `Rescheduled`.
    Reservation { outcome: ReservationOutcome, assigned_hour: Option<i64>, current_hour: i64, message: String },
}
