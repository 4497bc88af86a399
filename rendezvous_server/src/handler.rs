//! Per-connection WebSocket handling
//!
//! Each connection runs a reader loop in its own task and a writer task that
//! drains the connection's outbox. Frames and the final close for one
//! connection are therefore handled in the order they arrive.

use crate::coordinator::{Admission, Coordinator};
use crate::error::{ClientRequestError, SignalingError};
use crate::outbox::{Outbound, Outbox};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, trace, warn};

/// Serve one accepted TCP connection until it closes
pub async fn handle_connection(
    stream: TcpStream,
    coordinator: Arc<Coordinator>,
    queue_depth: usize,
) -> Result<(), SignalingError> {
    let addr = stream.peer_addr()?;
    let ws_stream = accept_async(stream).await?;
    debug!("WebSocket connection from {}", addr);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (outbox, mut inbox) = Outbox::channel(queue_depth);

    let writer = tokio::spawn(async move {
        while let Some(item) = inbox.recv().await {
            let frame = match item {
                Outbound::Notice(text) | Outbound::Signal(text) => Message::text(text),
                Outbound::Close => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            };
            if let Err(e) = ws_tx.send(frame).await {
                debug!("Failed to send to {}: {}", addr, e);
                break;
            }
        }
    });

    let peer_id = match coordinator.admit(outbox) {
        Admission::Admitted(id) => id,
        Admission::Rejected(_) => {
            let _ = writer.await;
            return Ok(());
        }
    };

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => match coordinator.dispatch(&peer_id, text.as_str()) {
                Ok(_) => {}
                Err(ClientRequestError::UnsupportedType(kind)) => {
                    trace!("Ignoring {} message from {}", kind, peer_id.short())
                }
                Err(e @ ClientRequestError::Malformed(_)) => {
                    debug!("Error processing message from {}: {}", peer_id.short(), e)
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_id.short(), e);
                break;
            }
        }
    }

    // Dropping the registry's outbox lets the writer drain what is queued and exit
    coordinator.teardown(&peer_id);
    let _ = writer.await;

    Ok(())
}
