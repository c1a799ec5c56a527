//! WebSocket message types for the image feed.

use serde::Serialize;

use crate::broadcast::BroadcastEvent;

/// Messages sent from server to client.
///
/// Clients send nothing beyond connect/disconnect; there is no client message
/// type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// A new image is available at the given URL.
    NewImage(String),
}

impl From<&BroadcastEvent> for ServerMessage {
    fn from(event: &BroadcastEvent) -> Self {
        match event {
            BroadcastEvent::NewImage { url } => ServerMessage::NewImage(url.to_string()),
        }
    }
}
