use serde::Serialize;

/// Earliest hour the park can ever open.
pub const EARLIEST_HOUR: i64 = 7;

/// Latest hour the park can ever stay open.
pub const LATEST_HOUR: i64 = 19;

/// Every reservation occupies this many consecutive hours.
pub const RESERVATION_DURATION: i64 = 2;

/// Returns true if `hour` lies within the absolute bounds the park can operate in.
pub fn is_valid_hour(hour: i64) -> bool {
    (EARLIEST_HOUR..=LATEST_HOUR).contains(&hour)
}

/// The simulated operating window of one run, `[open..=close]` in whole hours.
///
/// Both bounds are inclusive and must lie within the absolute hour bounds;
/// construction is validated by the configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingWindow {
    pub open: i64,
    pub close: i64,
}

impl OperatingWindow {
    pub fn new(open: i64, close: i64) -> OperatingWindow {
        OperatingWindow { open, close }
    }

    pub fn contains(&self, hour: i64) -> bool {
        (self.open..=self.close).contains(&hour)
    }

    /// Index of `hour` into the occupancy table. Caller must check `contains` first.
    pub fn index(&self, hour: i64) -> usize {
        (hour - self.open) as usize
    }

    /// Number of hours in the window.
    pub fn len(&self) -> usize {
        (self.close - self.open + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.close < self.open
    }

    pub fn hours(&self) -> impl Iterator<Item = i64> {
        self.open..=self.close
    }

    /// Latest hour a full `RESERVATION_DURATION`-long reservation can still start at.
    pub fn last_full_start(&self) -> i64 {
        self.close - RESERVATION_DURATION + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_arithmetic() {
        let window = OperatingWindow::new(7, 15);
        assert!(window.contains(7));
        assert!(window.contains(15));
        assert!(!window.contains(16));
        assert_eq!(window.index(9), 2);
        assert_eq!(window.len(), 9);
        assert_eq!(window.last_full_start(), 14);
    }
}
