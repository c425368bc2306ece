use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;

use park_reservations::dispatch::RequestDispatcher;
use park_reservations::domain::admission::AdmissionEngine;
use park_reservations::domain::hours::OperatingWindow;
use park_reservations::domain::ledger::OccupancyLedger;
use park_reservations::domain::registry::AgentRegistry;
use park_reservations::transport::endpoint::{AgentCodec, Endpoint};
use park_reservations::transport::protocol::{AgentMessage, ControllerResponse, ReservationOutcome};

struct Server {
    addr: std::net::SocketAddr,
    engine: Arc<AdmissionEngine>,
    shutdown: CancellationToken,
}

async fn start_server(capacity: i64) -> Server {
    let ledger = Arc::new(OccupancyLedger::new(OperatingWindow::new(7, 15), capacity));
    let engine = Arc::new(AdmissionEngine::new(ledger));
    let registry = Arc::new(AgentRegistry::new(10));
    let shutdown = CancellationToken::new();

    let endpoint = Endpoint::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = endpoint.local_addr().expect("no local addr");

    let (inbound_tx, inbound_rx) = mpsc::channel(16);
    tokio::spawn(endpoint.run(inbound_tx, shutdown.clone()));

    let dispatcher = RequestDispatcher::new(Arc::clone(&engine), registry, inbound_rx, shutdown.clone()).with_poll_interval(Duration::from_millis(20));
    tokio::spawn(dispatcher.run());

    Server { addr, engine, shutdown }
}

async fn connect(server: &Server) -> Framed<TcpStream, AgentCodec> {
    let stream = TcpStream::connect(server.addr).await.expect("connect failed");
    Framed::new(stream, AgentCodec::new())
}

async fn next(framed: &mut Framed<TcpStream, AgentCodec>) -> ControllerResponse {
    timeout(Duration::from_secs(2), framed.next()).await.expect("no response in time").expect("connection closed").expect("codec error")
}

#[tokio::test]
async fn register_and_reserve_over_the_wire() {
    let server = start_server(10).await;
    let mut framed = connect(&server).await;

    framed.send(AgentMessage::Register { agent_name: "a1".to_string() }).await.expect("send failed");
    assert!(matches!(next(&mut framed).await, ControllerResponse::CurrentHour { current_hour: 7, .. }));

    framed
        .send(AgentMessage::ReservationRequest { agent_name: "a1".to_string(), family_name: "Garcia".to_string(), requested_hour: 8, party_size: 5 })
        .await
        .expect("send failed");

    match next(&mut framed).await {
        ControllerResponse::Reservation { outcome, assigned_hour, message, .. } => {
            assert_eq!(outcome, ReservationOutcome::Accepted);
            assert_eq!(assigned_hour, Some(8));
            assert!(message.contains("APPROVED"));
        }
        other => panic!("expected a reservation response, got {:?}", other),
    }

    server.shutdown.cancel();
}

#[tokio::test]
async fn two_agents_share_the_capacity_without_overcommit() {
    let server = start_server(10).await;
    let mut first = connect(&server).await;
    let mut second = connect(&server).await;

    first
        .send(AgentMessage::ReservationRequest { agent_name: "a1".to_string(), family_name: "Lopez".to_string(), requested_hour: 9, party_size: 6 })
        .await
        .expect("send failed");
    let first_outcome = match next(&mut first).await {
        ControllerResponse::Reservation { outcome, .. } => outcome,
        other => panic!("expected a reservation response, got {:?}", other),
    };
    assert_eq!(first_outcome, ReservationOutcome::Accepted);

    second
        .send(AgentMessage::ReservationRequest { agent_name: "a2".to_string(), family_name: "Marin".to_string(), requested_hour: 9, party_size: 6 })
        .await
        .expect("send failed");
    match next(&mut second).await {
        ControllerResponse::Reservation { outcome, assigned_hour, .. } => {
            assert_eq!(outcome, ReservationOutcome::Rescheduled);
            // The search starts at the current hour, so the party lands on
            // the earliest free window of the day, not after the full hour.
            assert_eq!(assigned_hour, Some(7));
        }
        other => panic!("expected a reservation response, got {:?}", other),
    }

    for (_, count) in server.engine.ledger().snapshot().occupancy {
        assert!(count <= 10);
    }

    server.shutdown.cancel();
}

#[tokio::test]
async fn a_vanished_agent_does_not_break_the_run() {
    let server = start_server(10).await;

    let mut gone = connect(&server).await;
    gone.send(AgentMessage::ReservationRequest { agent_name: "ghost".to_string(), family_name: "Ghost".to_string(), requested_hour: 8, party_size: 2 })
        .await
        .expect("send failed");
    drop(gone);

    // The controller must keep serving other agents afterwards.
    let mut framed = connect(&server).await;
    framed.send(AgentMessage::Register { agent_name: "a2".to_string() }).await.expect("send failed");
    assert!(matches!(next(&mut framed).await, ControllerResponse::CurrentHour { .. }));

    server.shutdown.cancel();
}
