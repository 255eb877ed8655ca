//! Shared building blocks for the welcome notifier: logging setup, clocks
//! and the wire protocol spoken with the welcome server.

pub mod logger;
pub mod protocol;
pub mod time;
