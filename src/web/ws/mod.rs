//! WebSocket module for real-time upload notifications.

pub mod feed;
pub mod messages;

pub use feed::feed_ws_handler;
pub use messages::ServerMessage;
