use serde::Serialize;

use crate::domain::hours::RESERVATION_DURATION;

/// One admitted reservation.
///
/// Reservations are append-only: once committed to the ledger nothing is ever
/// mutated except the `active` flag, which the clock driver flips when the
/// reservation's window opens and closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub family_name: String,
    pub agent_name: String,
    /// First occupied hour (inclusive).
    pub start_hour: i64,
    /// Last occupied hour (inclusive), `start_hour + RESERVATION_DURATION - 1`.
    pub end_hour: i64,
    pub party_size: i64,
    pub active: bool,
}

impl Reservation {
    pub fn new(family_name: impl Into<String>, agent_name: impl Into<String>, start_hour: i64, party_size: i64) -> Reservation {
        Reservation {
            family_name: family_name.into(),
            agent_name: agent_name.into(),
            start_hour,
            end_hour: start_hour + RESERVATION_DURATION - 1,
            party_size,
            active: false,
        }
    }
}
