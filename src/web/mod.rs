//! Web API module for photocast.
//!
//! This module provides the HTTP upload endpoint, static serving of stored
//! images, and the WebSocket feed that pushes new image URLs to viewers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod ws;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
