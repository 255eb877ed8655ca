//! Per-page-load connection state.
//!
//! A [`Session`] owns the channel handle together with the connection error
//! counter. It is created when the page becomes ready and closed once the
//! counter hits [`MAX_CONNECT_ERRORS`].

use crate::channel::{Channel, Endpoint};

/// Number of connection errors after which the channel is closed.
pub const MAX_CONNECT_ERRORS: u32 = 3;

/// Lifecycle of the connection within one page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Closed,
}

/// Result of recording a connection error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Counted; the channel stays open
    Counted(u32),
    /// This error was the last one allowed; the channel must be closed
    LimitReached,
    /// The session is already closed; nothing was counted
    Ignored,
}

/// Check whether the error count triggers closing the channel.
///
/// Only the exact count triggers, so a closed session is never closed twice.
pub fn is_error_limit(error_count: u32) -> bool {
    error_count == MAX_CONNECT_ERRORS
}

pub struct Session<C: Channel> {
    channel: C,
    endpoint: Endpoint,
    error_count: u32,
    state: ConnectionState,
}

impl<C: Channel> Session<C> {
    /// Start a session on a freshly opened channel
    pub fn open(channel: C, endpoint: Endpoint) -> Self {
        Self {
            channel,
            endpoint,
            error_count: 0,
            state: ConnectionState::Connecting,
        }
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// The transport reports the link is up. Returns `false` if ignored.
    pub fn mark_connected(&mut self) -> bool {
        if self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Connected;
        true
    }

    /// The transport lost an established link. Returns `false` if ignored.
    pub fn mark_disconnected(&mut self) -> bool {
        if self.state != ConnectionState::Connected {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    /// Count one connection error. The counter is never reset.
    pub fn record_connect_error(&mut self) -> ErrorOutcome {
        if self.is_closed() {
            return ErrorOutcome::Ignored;
        }

        self.error_count += 1;
        if is_error_limit(self.error_count) {
            ErrorOutcome::LimitReached
        } else {
            ErrorOutcome::Counted(self.error_count)
        }
    }

    /// Disconnect the channel and enter the terminal state
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.channel.disconnect();
        self.state = ConnectionState::Closed;
    }
}
