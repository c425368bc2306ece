use std::time::Duration;

use clap::Parser;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use park_reservations::config::AgentConfig;
use park_reservations::console;
use park_reservations::error::{Error, Result};
use park_reservations::loader::load_requests;
use park_reservations::logger;
use park_reservations::transport::endpoint::AgentCodec;
use park_reservations::transport::protocol::{AgentMessage, ControllerResponse, ReservationOutcome};

/// Pause between consecutive requests, as in the original agent.
const REQUEST_PACING: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    logger::init("agent.log");
    console::print_banner("Agent");

    let config = AgentConfig::parse();
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: AgentConfig) -> Result<()> {
    let requests = load_requests(&config.requests_file)?;
    log::info!("Agent '{}' loaded {} requests from '{}'", config.name, requests.len(), config.requests_file);

    let stream = TcpStream::connect(&config.controller).await?;
    let mut framed = Framed::new(stream, AgentCodec::new());

    framed.send(AgentMessage::Register { agent_name: config.name.clone() }).await?;
    match next_response(&mut framed).await? {
        ControllerResponse::CurrentHour { current_hour, message } => {
            println!("{}", message);
            log::info!("Registered with the controller, current hour {}:00", current_hour);
        }
        other => log::warn!("Unexpected answer to the registration: {:?}", other),
    }

    for request in requests {
        log::info!("Requesting hour {}:00 for family '{}' ({} people)", request.requested_hour, request.family_name, request.party_size);

        framed
            .send(AgentMessage::ReservationRequest {
                agent_name: config.name.clone(),
                family_name: request.family_name.clone(),
                requested_hour: request.requested_hour,
                party_size: request.party_size,
            })
            .await?;

        match next_response(&mut framed).await? {
            ControllerResponse::Reservation { outcome, assigned_hour, current_hour, message } => {
                let marker = match outcome {
                    ReservationOutcome::Accepted => "OK",
                    ReservationOutcome::Rescheduled => "MOVED",
                    ReservationOutcome::Rejected => "DENIED",
                };
                println!("[{}] {} (current hour {}:00)", marker, message, current_hour);
                if let Some(hour) = assigned_hour {
                    log::info!("Family '{}' assigned to {}:00", request.family_name, hour);
                }
            }
            other => log::warn!("Unexpected answer to a reservation request: {:?}", other),
        }

        tokio::time::sleep(REQUEST_PACING).await;
    }

    framed.send(AgentMessage::Finished { agent_name: config.name.clone() }).await?;
    println!("Agent {} done.", config.name);
    Ok(())
}

async fn next_response(framed: &mut Framed<TcpStream, AgentCodec>) -> Result<ControllerResponse> {
    match framed.next().await {
        Some(Ok(response)) => Ok(response),
        Some(Err(e)) => Err(e.into()),
        None => Err(Error::ConnectionClosed),
    }
}
