use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::domain::hours::RESERVATION_DURATION;
use crate::domain::ledger::OccupancyLedger;

/// Terminal outcome of one admission decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Admitted at the requested hour.
    Accepted { hour: i64 },
    /// Admitted at the earliest later hour with room.
    Rescheduled { hour: i64 },
    Rejected { reason: String },
}

impl AdmissionDecision {
    pub fn assigned_hour(&self) -> Option<i64> {
        match self {
            AdmissionDecision::Accepted { hour } | AdmissionDecision::Rescheduled { hour } => Some(*hour),
            AdmissionDecision::Rejected { .. } => None,
        }
    }
}

/// Monotonic per-run request counters, read by the reporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunningCounters {
    pub accepted: u64,
    pub rescheduled: u64,
    pub rejected: u64,
}

impl RunningCounters {
    pub fn total(&self) -> u64 {
        self.accepted + self.rescheduled + self.rejected
    }
}

/// The admission engine: evaluates the decision rules in order against the
/// shared ledger and keeps the running counters.
///
/// Rule order (first match wins):
/// 1. requested hour outside the operating window -> reject
/// 2. party size not positive, or larger than total capacity -> reject, no search
/// 3. requested hour already past -> alternative search from the current hour
/// 4. availability at the requested hour -> accept, else alternative search
///
/// Every terminal branch increments exactly one counter.
#[derive(Debug)]
pub struct AdmissionEngine {
    ledger: Arc<OccupancyLedger>,
    counters: Mutex<RunningCounters>,
}

impl AdmissionEngine {
    pub fn new(ledger: Arc<OccupancyLedger>) -> AdmissionEngine {
        AdmissionEngine { ledger, counters: Mutex::new(RunningCounters::default()) }
    }

    pub fn ledger(&self) -> &OccupancyLedger {
        &self.ledger
    }

    pub fn counters(&self) -> RunningCounters {
        *self.counters.lock().expect("Mutex poisoned")
    }

    pub fn decide(&self, family_name: &str, agent_name: &str, requested_hour: i64, party_size: i64) -> AdmissionDecision {
        let window = self.ledger.window();
        let capacity = self.ledger.capacity();

        if !window.contains(requested_hour) {
            return self.reject(format!(
                "Reservation DENIED - Requested hour {}:00 is outside the operating window ({}:00-{}:00)",
                requested_hour, window.open, window.close
            ));
        }

        if party_size <= 0 {
            // A zero or negative size would pass every capacity check and
            // corrupt the occupancy table once committed.
            return self.reject(format!("Reservation DENIED - A party of {} people cannot be admitted", party_size));
        }

        if party_size > capacity {
            // An over-capacity party can never fit at any hour, so no search.
            return self.reject(format!(
                "Reservation DENIED - Party of {} exceeds the total capacity of {}. Please come back another day",
                party_size, capacity
            ));
        }

        let current_hour = self.ledger.current_hour();
        if requested_hour < current_hour {
            log::warn!("Late request from agent '{}': hour {}:00 is already past (current {}:00)", agent_name, requested_hour, current_hour);
            return match self.ledger.admit_alternative(family_name, agent_name, party_size) {
                Some(hour) => self.reschedule(hour, "the requested hour had already passed"),
                None => self.reject("Reservation DENIED - The requested hour has passed and no later hour has room. Please come back another day".to_string()),
            };
        }

        if self.ledger.try_admit(family_name, agent_name, requested_hour, party_size) {
            self.count(|c| c.accepted += 1);
            return AdmissionDecision::Accepted { hour: requested_hour };
        }

        match self.ledger.admit_alternative(family_name, agent_name, party_size) {
            Some(hour) => self.reschedule(hour, "no room at the requested hour"),
            None => self.reject("Reservation DENIED - No capacity at the requested hour nor at any later hour. Please come back another day".to_string()),
        }
    }

    fn reschedule(&self, hour: i64, cause: &str) -> AdmissionDecision {
        self.count(|c| c.rescheduled += 1);
        log::info!("Reservation RESCHEDULED to {}:00-{}:00 ({})", hour, hour + RESERVATION_DURATION, cause);
        AdmissionDecision::Rescheduled { hour }
    }

    fn reject(&self, reason: String) -> AdmissionDecision {
        self.count(|c| c.rejected += 1);
        AdmissionDecision::Rejected { reason }
    }

    fn count(&self, update: impl FnOnce(&mut RunningCounters)) {
        let mut counters = self.counters.lock().expect("Mutex poisoned");
        update(&mut counters);
    }
}
