//! Broadcast of upload notifications for photocast.
//!
//! The hub is an explicitly owned object shared through the web layer's
//! state; there is no global registry.

mod event;
mod hub;

pub use event::BroadcastEvent;
pub use hub::{BroadcastHub, ClientId, EventReceiver, CLIENT_QUEUE_CAPACITY};
