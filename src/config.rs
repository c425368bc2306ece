use clap::Parser;

use crate::domain::hours::{is_valid_hour, EARLIEST_HOUR, LATEST_HOUR, OperatingWindow};
use crate::error::{Error, Result};

/// Startup options of the `controller` binary. Short flags mirror the
/// original command line (`-i -f -s -t -p`).
#[derive(Parser, Debug, Clone)]
#[command(name = "controller", about = "Berlin Park reservation controller")]
pub struct ControllerConfig {
    /// Opening hour of the simulated day.
    #[arg(short = 'i', long = "open-hour")]
    pub open_hour: i64,

    /// Closing hour of the simulated day.
    #[arg(short = 'f', long = "close-hour")]
    pub close_hour: i64,

    /// Real seconds per simulated hour.
    #[arg(short = 's', long = "seconds-per-hour")]
    pub seconds_per_hour: u64,

    /// Maximum number of people in the park in any one hour.
    #[arg(short = 't', long = "capacity")]
    pub capacity: i64,

    /// Listen address for agent connections, e.g. 127.0.0.1:7700.
    #[arg(short = 'p', long = "listen")]
    pub listen: String,
}

impl ControllerConfig {
    /// Validates the configuration. Must pass before any worker starts.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_hour(self.open_hour) || !is_valid_hour(self.close_hour) {
            return Err(Error::Configuration(format!("hours must lie between {} and {}", EARLIEST_HOUR, LATEST_HOUR)));
        }
        if self.open_hour >= self.close_hour {
            return Err(Error::Configuration("the opening hour must be before the closing hour".to_string()));
        }
        if self.seconds_per_hour == 0 {
            return Err(Error::Configuration("seconds per hour must be greater than 0".to_string()));
        }
        if self.capacity <= 0 {
            return Err(Error::Configuration("the capacity must be greater than 0".to_string()));
        }
        if self.listen.trim().is_empty() {
            return Err(Error::Configuration("a listen address is required".to_string()));
        }
        Ok(())
    }

    pub fn window(&self) -> OperatingWindow {
        OperatingWindow::new(self.open_hour, self.close_hour)
    }
}

/// Startup options of the `agent` binary (`-s -a -p` as in the original).
#[derive(Parser, Debug, Clone)]
#[command(name = "agent", about = "Berlin Park reservation agent")]
pub struct AgentConfig {
    /// Name of this agent.
    #[arg(short = 's', long = "name")]
    pub name: String,

    /// CSV file of reservation requests: family,hour,party_size per line.
    #[arg(short = 'a', long = "requests")]
    pub requests_file: String,

    /// Address of the controller, e.g. 127.0.0.1:7700.
    #[arg(short = 'p', long = "controller")]
    pub controller: String,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Configuration("the agent name must not be empty".to_string()));
        }
        if self.controller.trim().is_empty() {
            return Err(Error::Configuration("a controller address is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(open: i64, close: i64, seconds: u64, capacity: i64) -> ControllerConfig {
        ControllerConfig { open_hour: open, close_hour: close, seconds_per_hour: seconds, capacity, listen: "127.0.0.1:0".to_string() }
    }

    #[test]
    fn rejects_invalid_combinations() {
        assert!(config(7, 15, 1, 10).validate().is_ok());
        assert!(config(6, 15, 1, 10).validate().is_err());
        assert!(config(7, 20, 1, 10).validate().is_err());
        assert!(config(15, 7, 1, 10).validate().is_err());
        assert!(config(7, 15, 0, 10).validate().is_err());
        assert!(config(7, 15, 1, 0).validate().is_err());
    }
}
