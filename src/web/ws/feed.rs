//! Image feed WebSocket handler.
//!
//! Every connection is registered with the broadcast hub for as long as the
//! socket stays open and receives a `new-image` message per upload.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::broadcast::{BroadcastEvent, ClientId, EventReceiver};
use crate::web::handlers::AppState;

use super::messages::ServerMessage;

/// WebSocket image feed handler.
///
/// GET /ws
pub async fn feed_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| async move {
        let (client_id, events) = hub.connect().await;
        tracing::info!("Viewer connected: {}", client_id);

        handle_socket(socket, client_id, events).await;

        hub.disconnect(client_id).await;
        tracing::info!("Viewer disconnected: {}", client_id);
    })
}

/// Pump hub events into the socket until either side goes away.
async fn handle_socket(socket: WebSocket, client_id: ClientId, mut events: EventReceiver) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    loop {
        tokio::select! {
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("WebSocket closed by client: {}", client_id);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if ws_sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    // No client-to-server protocol
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("WebSocket error for {}: {}", client_id, e);
                        break;
                    }
                }
            }

            event = events.recv() => {
                let Some(event) = event else {
                    // Hub dropped our sender
                    break;
                };
                if send_event(&mut ws_sender, &event).await.is_err() {
                    tracing::debug!("Failed to deliver {} to {}", event.kind(), client_id);
                    break;
                }
            }
        }
    }
}

async fn send_event(
    ws_sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    event: &BroadcastEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(&ServerMessage::from(event)) {
        Ok(json) => ws_sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::warn!("Failed to serialize {}: {}", event.kind(), e);
            Ok(())
        }
    }
}
