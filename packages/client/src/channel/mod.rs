//! Real-time channel to the welcome server.
//!
//! The notifier talks to the channel through the [`Channel`] and
//! [`Connector`] traits; whatever happens on the wire comes back to it as
//! [`ChannelEvent`]s on the event loop queue.

pub mod websocket;

use std::time::Duration;

use thiserror::Error;
use welcome_shared::protocol::{InboundEvent, OutboundEvent};

use crate::page::Location;

pub use websocket::{WebSocketChannel, WebSocketConnector};

/// Default path of the WebSocket endpoint on the page origin.
pub const DEFAULT_SOCKET_PATH: &str = "/ws";

/// Delay between two connect attempts of the transport.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Time a single connect attempt may take before it counts as failed.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// Channel errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel was disconnected and accepts nothing more
    #[error("Channel is closed")]
    Closed,

    /// The event could not be encoded into a frame
    #[error("Failed to encode event: {0}")]
    Encode(String),
}

/// What the transport reports back to the notifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The link is up
    Connected,
    /// An event pushed by the server
    Message(InboundEvent),
    /// A connect attempt failed
    ConnectError(String),
    /// An established link was lost
    Disconnected(String),
}

/// Handle to an open channel.
#[cfg_attr(test, mockall::automock)]
pub trait Channel {
    /// Queue an event for the server. Never blocks.
    fn emit(&mut self, event: OutboundEvent) -> Result<(), ChannelError>;

    /// Close the channel for good.
    fn disconnect(&mut self);

    fn is_closed(&self) -> bool;
}

/// Opens channels to an endpoint.
pub trait Connector {
    type Channel: Channel;

    fn open(&mut self, endpoint: &Endpoint) -> Self::Channel;
}

/// Where a channel connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    location: Location,
    secure: bool,
    path: String,
}

impl Endpoint {
    /// Secure endpoint on the page origin
    pub fn secure(location: Location, path: impl Into<String>) -> Self {
        Self::new(location, true, path)
    }

    pub fn new(location: Location, secure: bool, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };

        Self {
            location,
            secure,
            path,
        }
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Origin the channel belongs to, `https://domain:port`
    pub fn target_url(&self) -> String {
        if self.secure {
            self.location.origin()
        } else {
            format!("http://{}", self.location.authority())
        }
    }

    /// URL the transport actually dials
    pub fn websocket_url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}{}", scheme, self.location.authority(), self.path)
    }
}

/// Transport tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub reconnect_delay: Duration,
    pub connect_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
