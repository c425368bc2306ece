use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;

use crate::dispatch::{Inbound, ReplyHandle, REPLY_BUFFER};
use crate::error::Result;
use crate::transport::codec::WireCodec;
use crate::transport::protocol::{AgentMessage, ControllerResponse};

/// Codec as seen from the controller side of a connection.
pub type ControllerCodec = WireCodec<AgentMessage, ControllerResponse>;

/// Codec as seen from the agent side of a connection.
pub type AgentCodec = WireCodec<ControllerResponse, AgentMessage>;

/// The controller's listening endpoint.
///
/// Accepts agent connections and runs one session task per connection. A
/// session forwards every decoded message, together with a reply handle
/// bound to its own write half, onto the dispatcher's channel. This replaces
/// the original named-pipe plumbing: the response destination named by a
/// message is the session it arrived on.
pub struct Endpoint {
    listener: TcpListener,
}

impl Endpoint {
    pub async fn bind(addr: &str) -> Result<Endpoint> {
        let listener = TcpListener::bind(addr).await?;
        log::info!("Listening for agents on {}", listener.local_addr()?);
        Ok(Endpoint { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. Returns once the stop signal trips; in-flight sessions
    /// wind down on their own when their peer or the dispatcher goes away.
    pub async fn run(self, inbound: mpsc::Sender<Inbound>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::debug!("Endpoint stopping, no longer accepting agents");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        log::debug!("Agent connection from {}", peer);
                        tokio::spawn(session(stream, inbound.clone(), shutdown.clone()));
                    }
                    Err(e) => {
                        // Transient accept failures must not kill the run.
                        log::warn!("Failed to accept an agent connection: {}", e);
                    }
                }
            }
        }
    }
}

/// One connected agent. Frames in are forwarded to the dispatcher, frames
/// out are drained from the session's bounded reply channel.
async fn session(stream: TcpStream, inbound: mpsc::Sender<Inbound>, shutdown: CancellationToken) {
    let (read_half, write_half) = stream.into_split();
    let mut framed_read = FramedRead::new(read_half, ControllerCodec::new());
    let mut framed_write = FramedWrite::new(write_half, ControllerCodec::new());

    let (reply_tx, mut reply_rx): (ReplyHandle, mpsc::Receiver<ControllerResponse>) = mpsc::channel(REPLY_BUFFER);

    let writer = tokio::spawn(async move {
        while let Some(response) = reply_rx.recv().await {
            if let Err(e) = framed_write.send(response).await {
                log::warn!("Failed to deliver a response to an agent: {}", e);
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = framed_read.next() => match frame {
                Some(Ok(message)) => {
                    if inbound.send(Inbound { message, reply: reply_tx.clone() }).await.is_err() {
                        // Dispatcher is gone, the run is over.
                        break;
                    }
                }
                Some(Err(e)) => {
                    log::warn!("Dropping agent session after a codec error: {}", e);
                    break;
                }
                None => break,
            }
        }
    }

    // The registry may hold clones of the reply handle for the rest of the
    // run, so the writer would never see a closed channel; once the peer is
    // gone nothing more can be delivered anyway.
    writer.abort();
    let _ = writer.await;
}
