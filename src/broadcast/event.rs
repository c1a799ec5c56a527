//! Events fanned out by the broadcast hub.

use url::Url;

/// An event pushed to every connected viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    /// A new image was stored and is reachable at `url`.
    NewImage {
        /// Public URL of the stored image.
        url: Url,
    },
}

impl BroadcastEvent {
    /// Create a new-image event.
    pub fn new_image(url: Url) -> Self {
        Self::NewImage { url }
    }

    /// Wire name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BroadcastEvent::NewImage { .. } => "new-image",
        }
    }
}

impl std::fmt::Display for BroadcastEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BroadcastEvent::NewImage { url } => write!(f, "{} {}", self.kind(), url),
        }
    }
}
