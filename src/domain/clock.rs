use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::ledger::{HourTransition, OccupancyLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Stopping,
    Stopped,
}

/// Advances the simulated hour on a fixed real-time tick.
///
/// Each tick performs exactly one `advance_hour` on the ledger followed by
/// the observability callback with the resulting transition. The driver
/// stops on its own once the advanced hour passes the closing hour, or
/// within one tick of the cancellation token tripping.
pub struct ClockDriver {
    ledger: Arc<OccupancyLedger>,
    tick: Duration,
    shutdown: CancellationToken,
    on_tick: Box<dyn Fn(&HourTransition) + Send + Sync>,
}

impl ClockDriver {
    pub fn new(
        ledger: Arc<OccupancyLedger>,
        tick: Duration,
        shutdown: CancellationToken,
        on_tick: Box<dyn Fn(&HourTransition) + Send + Sync>,
    ) -> ClockDriver {
        ClockDriver { ledger, tick, shutdown, on_tick }
    }

    /// Runs the simulation clock to completion.
    ///
    /// # Returns
    /// The final state, always `ClockState::Stopped`.
    pub async fn run(&self) -> ClockState {
        let close = self.ledger.window().close;
        let mut state = ClockState::Running;

        while state == ClockState::Running {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    log::info!("Clock received the stop signal at {}:00", self.ledger.current_hour());
                    state = ClockState::Stopping;
                }
                _ = tokio::time::sleep(self.tick) => {
                    let transition = self.ledger.advance_hour();
                    (self.on_tick)(&transition);

                    if transition.hour > close {
                        log::info!("Closing hour reached, the day is over");
                        state = ClockState::Stopping;
                    }
                }
            }
        }

        ClockState::Stopped
    }
}
