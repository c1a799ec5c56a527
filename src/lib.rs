//! photocast - image upload relay
//!
//! Accepts single image uploads over HTTP, stores them on local disk, and
//! pushes each new image URL to every connected WebSocket viewer.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use broadcast::{BroadcastEvent, BroadcastHub, ClientId};
pub use config::Config;
pub use error::{PhotocastError, Result};
pub use file::{FileStorage, UploadedFile};
pub use web::WebServer;
