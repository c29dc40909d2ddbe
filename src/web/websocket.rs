//! WebSocket connection lifecycle.
//!
//! Each accepted connection is split into a writer task draining the
//! client's hub queue (preserving per-connection order) and a reader task
//! feeding inbound text to the command dispatcher. Either side ending
//! deregisters the client.

use crate::panel::dispatcher::CommandDispatcher;
use crate::panel::messages::{hello_message, led_message};
use crate::web::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Upgrade the request and hand the socket to [`handle_socket`].
pub fn upgrade(ws: WebSocketUpgrade, state: AppState, peer: SocketAddr) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

async fn handle_socket(socket: WebSocket, state: AppState, peer: SocketAddr) {
    info!(%peer, "WebSocket client connected");

    // Register under the panel lock: the snapshot lines and any later
    // LED broadcast are ordered by the same lock, so the client's first
    // messages always reflect a consistent state.
    let (client_id, mut outbound) = {
        let panel = state.panel.lock().await;
        let snapshot = panel
            .led_levels()
            .into_iter()
            .map(|(color, on)| led_message(color, on))
            .collect();
        state
            .hub
            .register(hello_message(&state.server_addr), snapshot)
            .await
    };

    let (mut sender, mut receiver) = socket.split();

    // Writer: drain the hub queue into the socket in order.
    let send_peer = peer;
    let send_task = tokio::spawn(async move {
        while let Some(line) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(line)).await {
                warn!(peer = %send_peer, error = %e, "Failed to send to client");
                break;
            }
        }
    });

    // Reader: parse and apply inbound commands.
    let dispatcher = CommandDispatcher::new(state.panel.clone(), state.hub.clone());
    let recv_peer = peer;
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    debug!(peer = %recv_peer, %text, "Received message");
                    if let Err(e) = dispatcher.handle(&text).await {
                        warn!(peer = %recv_peer, error = %e, "Command failed");
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!(peer = %recv_peer, "Client sent close");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(peer = %recv_peer, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }

    // Dropping the hub entry closes the queue, which ends the writer if it
    // is still running.
    state.hub.deregister(client_id).await;
    info!(%peer, "WebSocket client disconnected");
}
