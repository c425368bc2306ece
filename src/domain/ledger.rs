use std::sync::Mutex;

use serde::Serialize;

use crate::domain::hours::{OperatingWindow, RESERVATION_DURATION};
use crate::domain::reservation::Reservation;

/// Everything the ledger protects with its single lock: the per-hour
/// occupancy table, the append-only reservation list and the simulated hour.
///
/// The hour lives here on purpose: advancing the clock and flipping
/// reservation activation must be one critical section, exactly like an
/// availability check and its commit.
#[derive(Debug)]
struct LedgerState {
    current_hour: i64,
    occupancy: Vec<i64>,
    reservations: Vec<Reservation>,
}

/// The occupancy ledger: time-indexed capacity table plus reservation list.
///
/// All mutation goes through the atomic operations below; callers never touch
/// the table directly. The central correctness property of the whole system
/// is that an availability check and its commit are one critical section, so
/// two concurrent admissions can never both pass the check and jointly
/// overflow an hour.
#[derive(Debug)]
pub struct OccupancyLedger {
    window: OperatingWindow,
    capacity: i64,
    inner: Mutex<LedgerState>,
}

/// What changed when the clock advanced one hour, for the observability
/// callback of the clock driver.
#[derive(Debug, Clone)]
pub struct HourTransition {
    /// The hour just entered.
    pub hour: i64,
    /// Reservations whose window opens at this hour.
    pub entering: Vec<Reservation>,
    /// Reservations whose window ended the previous hour.
    pub leaving: Vec<Reservation>,
    /// Occupancy booked for this hour, 0 once past the window.
    pub occupancy: i64,
}

/// A consistent copy of the final ledger state, for the reporter and tests.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub current_hour: i64,
    /// `(hour, booked person count)` for every hour of the operating window.
    pub occupancy: Vec<(i64, i64)>,
    pub reservations: Vec<Reservation>,
}

impl OccupancyLedger {
    pub fn new(window: OperatingWindow, capacity: i64) -> OccupancyLedger {
        let state = LedgerState { current_hour: window.open, occupancy: vec![0; window.len()], reservations: Vec::new() };
        OccupancyLedger { window, capacity, inner: Mutex::new(state) }
    }

    pub fn window(&self) -> OperatingWindow {
        self.window
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn current_hour(&self) -> i64 {
        self.inner.lock().expect("Mutex poisoned").current_hour
    }

    /// Checks whether a party fits at `start_hour` and commits the
    /// reservation if it does, as one critical section.
    ///
    /// Hours of the duration window that fall outside the operating window
    /// are skipped in both the check and the commit: a reservation starting
    /// at the closing hour occupies only the closing hour. This clipping is
    /// deliberate policy, not an accident of bounds checking.
    ///
    /// # Returns
    /// `true` if the reservation was committed.
    pub fn try_admit(&self, family_name: &str, agent_name: &str, start_hour: i64, party_size: i64) -> bool {
        let mut state = self.inner.lock().expect("Mutex poisoned");

        if !self.fits_clipped(&state, start_hour, party_size) {
            return false;
        }

        self.commit(&mut state, Reservation::new(family_name, agent_name, start_hour, party_size));
        true
    }

    /// Earliest-fit search from the current hour, committing at the first
    /// candidate whose whole duration window is in range and has room.
    ///
    /// Unlike `try_admit`, a candidate here must fit *every* hour of its
    /// window; the search never proposes a start past
    /// `close - duration + 1`.
    ///
    /// # Returns
    /// The assigned start hour, or `None` when no later hour has room.
    pub fn admit_alternative(&self, family_name: &str, agent_name: &str, party_size: i64) -> Option<i64> {
        let mut state = self.inner.lock().expect("Mutex poisoned");

        let mut candidate = state.current_hour.max(self.window.open);
        while candidate <= self.window.last_full_start() {
            if self.fits_full(&state, candidate, party_size) {
                self.commit(&mut state, Reservation::new(family_name, agent_name, candidate, party_size));
                return Some(candidate);
            }
            candidate += 1;
        }

        None
    }

    /// Advances the simulated hour by one and flips reservation activation:
    /// reservations starting at the new hour become active, reservations
    /// whose window has passed become inactive. One critical section.
    pub fn advance_hour(&self) -> HourTransition {
        let mut state = self.inner.lock().expect("Mutex poisoned");

        state.current_hour += 1;
        let hour = state.current_hour;

        for reservation in state.reservations.iter_mut() {
            if reservation.start_hour == hour {
                reservation.active = true;
            } else if reservation.end_hour < hour {
                reservation.active = false;
            }
        }

        let entering = state.reservations.iter().filter(|r| r.start_hour == hour).cloned().collect();
        let leaving = state.reservations.iter().filter(|r| r.end_hour == hour - 1).cloned().collect();
        let occupancy = if self.window.contains(hour) { state.occupancy[self.window.index(hour)] } else { 0 };

        HourTransition { hour, entering, leaving, occupancy }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.inner.lock().expect("Mutex poisoned");
        let occupancy = self.window.hours().map(|h| (h, state.occupancy[self.window.index(h)])).collect();
        LedgerSnapshot { current_hour: state.current_hour, occupancy, reservations: state.reservations.clone() }
    }

    /// Availability at `start_hour` with out-of-window tail hours skipped.
    fn fits_clipped(&self, state: &LedgerState, start_hour: i64, party_size: i64) -> bool {
        for hour in start_hour..start_hour + RESERVATION_DURATION {
            if !self.window.contains(hour) {
                continue;
            }
            if state.occupancy[self.window.index(hour)] + party_size > self.capacity {
                return false;
            }
        }
        true
    }

    /// Availability requiring the whole duration window to be in range.
    fn fits_full(&self, state: &LedgerState, start_hour: i64, party_size: i64) -> bool {
        for hour in start_hour..start_hour + RESERVATION_DURATION {
            if !self.window.contains(hour) {
                return false;
            }
            if state.occupancy[self.window.index(hour)] + party_size > self.capacity {
                return false;
            }
        }
        true
    }

    fn commit(&self, state: &mut LedgerState, reservation: Reservation) {
        for hour in reservation.start_hour..=reservation.end_hour {
            if self.window.contains(hour) {
                let index = self.window.index(hour);
                state.occupancy[index] += reservation.party_size;
            }
        }
        state.reservations.push(reservation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_and_commit_are_one_step() {
        let ledger = OccupancyLedger::new(OperatingWindow::new(7, 12), 10);
        assert!(ledger.try_admit("Lopez", "a1", 8, 6));
        // 6 + 6 would overflow hours 8 and 9
        assert!(!ledger.try_admit("Marin", "a2", 8, 6));
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.occupancy, vec![(7, 0), (8, 6), (9, 6), (10, 0), (11, 0), (12, 0)]);
    }

    #[test]
    fn tail_past_closing_hour_is_clipped() {
        let ledger = OccupancyLedger::new(OperatingWindow::new(7, 12), 10);
        assert!(ledger.try_admit("Solo", "a1", 12, 10));
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.occupancy.last(), Some(&(12, 10)));
        assert_eq!(snapshot.reservations[0].end_hour, 13);
    }
}
