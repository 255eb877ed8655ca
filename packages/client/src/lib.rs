//! Welcome notifier client.
//!
//! Shows a placeholder in a single display region, opens one secure
//! WebSocket channel to the origin it was loaded from, asks for the welcome
//! text and shows every text the server pushes. After three connection
//! errors the channel is closed and the display is left as it is.

pub mod channel;
pub mod display;
pub mod error;
pub mod event_loop;
pub mod notifier;
pub mod page;
pub mod runner;
pub mod session;

pub use error::ClientError;
pub use notifier::{NotifierConfig, WelcomeNotifier};
pub use runner::run_notifier;
