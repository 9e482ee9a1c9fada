//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! text frames are decoded and handed to the [`Matchmaker`], notices queued
//! for this connection are encoded and written back. When the socket closes
//! the matchmaker drops the connection from the queue, and only then is its
//! outbound channel unregistered.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::time::Instant;

use super::messages::{OutboundFrame, parse_frame};
use crate::app_state::AppState;
use crate::domain::{ConnectionId, InboundEvent, Notice};
use crate::service::Matchmaker;

/// Runs the read/write loop for a single WebSocket connection.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (connection_id, mut notice_rx) = state.connections.register(state.outbound_buffer);
    tracing::info!(%connection_id, open_connections = state.connections.len(), "new ws connection");

    let reason = loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&state.matchmaker, connection_id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) => break "client close".to_string(),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => break format!("transport error: {err}"),
                    None => break "transport close".to_string(),
                }
            }
            notice = notice_rx.recv() => {
                let Some(notice) = notice else {
                    break "outbound channel closed".to_string();
                };
                if !send_notice(&mut ws_tx, connection_id, &notice).await {
                    break "send failed".to_string();
                }
            }
        }
    };

    close_connection(&state, connection_id, reason).await;
}

/// Retires a closed connection. The queue forgets it before its outbound
/// channel goes away, so a concurrent join can never pair with it.
async fn close_connection(state: &AppState, connection_id: ConnectionId, reason: String) {
    state
        .matchmaker
        .handle(connection_id, InboundEvent::Disconnect { reason }, Instant::now())
        .await;
    state.connections.unregister(connection_id);
    tracing::debug!(%connection_id, open_connections = state.connections.len(), "ws connection unregistered");
}

/// Decodes one text frame and applies it, or reports why it was rejected.
async fn handle_text_message(matchmaker: &Arc<Matchmaker>, connection_id: ConnectionId, text: &str) {
    match parse_frame(text) {
        Ok(event) => {
            tracing::debug!(%connection_id, event = event.name(), "inbound event");
            matchmaker.handle(connection_id, event, Instant::now()).await;
        }
        Err(err) => matchmaker.reject(connection_id, &err),
    }
}

/// Writes one notice to the socket. Returns `false` once the socket is
/// unusable.
async fn send_notice(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
    notice: &Notice,
) -> bool {
    let json = match OutboundFrame::new(notice).to_json() {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(%connection_id, event = notice.event_name(), error = %err, "failed to encode notice");
            return true;
        }
    };
    ws_tx.send(Message::text(json)).await.is_ok()
}
