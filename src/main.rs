use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use park_reservations::config::ControllerConfig;
use park_reservations::console;
use park_reservations::dispatch::{Inbound, RequestDispatcher};
use park_reservations::domain::admission::AdmissionEngine;
use park_reservations::domain::clock::ClockDriver;
use park_reservations::domain::ledger::{HourTransition, OccupancyLedger};
use park_reservations::domain::registry::{AgentRegistry, MAX_AGENTS};
use park_reservations::transport::endpoint::Endpoint;
use park_reservations::{logger, report};

const INBOUND_BUFFER: usize = 64;

/// Time left for agents to receive their last responses after the clock stops.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    logger::init("controller.log");
    console::print_banner("Controller");

    let config = ControllerConfig::parse();
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let ledger = Arc::new(OccupancyLedger::new(config.window(), config.capacity));
    let engine = Arc::new(AdmissionEngine::new(Arc::clone(&ledger)));
    let registry = Arc::new(AgentRegistry::new(MAX_AGENTS));
    let shutdown = CancellationToken::new();

    let endpoint = match Endpoint::bind(&config.listen).await {
        Ok(endpoint) => endpoint,
        Err(e) => {
            log::error!("Could not open the listen endpoint '{}': {}", config.listen, e);
            std::process::exit(1);
        }
    };

    let (inbound_tx, inbound_rx) = mpsc::channel::<Inbound>(INBOUND_BUFFER);
    let endpoint_task = tokio::spawn(endpoint.run(inbound_tx, shutdown.clone()));

    let dispatcher = RequestDispatcher::new(Arc::clone(&engine), Arc::clone(&registry), inbound_rx, shutdown.clone());
    let dispatcher_task = tokio::spawn(dispatcher.run());

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupt received, shutting down");
                shutdown.cancel();
            }
        });
    }

    log::info!(
        "Controller started: hours {}:00-{}:00, capacity {}, {} s per hour, listening on {}",
        config.open_hour,
        config.close_hour,
        config.capacity,
        config.seconds_per_hour,
        config.listen
    );

    let capacity = config.capacity;
    let clock = ClockDriver::new(
        Arc::clone(&ledger),
        Duration::from_secs(config.seconds_per_hour),
        shutdown.clone(),
        Box::new(move |transition: &HourTransition| console::print_hour_status(transition, capacity)),
    );
    clock.run().await;

    // Shutdown ordering: clock stopped -> grace for in-flight responses ->
    // dispatcher stop -> report -> teardown.
    tokio::time::sleep(SHUTDOWN_GRACE).await;
    shutdown.cancel();
    let _ = dispatcher_task.await;
    let _ = endpoint_task.await;

    let final_report = report::build_report(&ledger.snapshot(), engine.counters(), config.capacity);
    console::print_report(&final_report);

    if let Err(e) = report::write_json(&final_report, "logs/report.json") {
        log::warn!("Could not write logs/report.json: {}", e);
    }
    if let Err(e) = report::write_csv(&final_report, "logs/occupancy.csv") {
        log::warn!("Could not write logs/occupancy.csv: {}", e);
    }

    log::info!("Controller finished cleanly");
}
