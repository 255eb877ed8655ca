//! Single-consumer event loop.
//!
//! Page lifecycle events and channel events arrive on two queues and are
//! handed to the handler one at a time. A handler call always runs to
//! completion before the next event is taken, so handlers need no locking.

use tokio::sync::mpsc;
use welcome_shared::protocol::{InboundEvent, WelcomePayload};

use crate::{channel::ChannelEvent, page::PageEvent};

/// Callbacks for page lifecycle events.
pub trait PageHandler {
    fn on_ready(&mut self);
    fn on_load(&mut self);
    fn on_unload(&mut self);
}

/// Callbacks for channel events.
pub trait ChannelHandler {
    fn on_connect(&mut self);
    fn on_new_message(&mut self, payload: WelcomePayload);
    fn on_connect_error(&mut self, reason: &str);
    fn on_disconnect(&mut self, reason: &str);
}

/// Dispatches queued events to a handler.
pub struct EventLoop {
    page_events: mpsc::UnboundedReceiver<PageEvent>,
    channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl EventLoop {
    pub fn new(
        page_events: mpsc::UnboundedReceiver<PageEvent>,
        channel_events: mpsc::UnboundedReceiver<ChannelEvent>,
    ) -> Self {
        Self {
            page_events,
            channel_events,
        }
    }

    /// Run until `Unload` has been dispatched or both queues are closed.
    pub async fn run<H>(mut self, handler: &mut H)
    where
        H: PageHandler + ChannelHandler,
    {
        let mut page_open = true;
        let mut channel_open = true;

        while page_open || channel_open {
            tokio::select! {
                biased;

                event = self.page_events.recv(), if page_open => match event {
                    Some(event) => {
                        dispatch_page_event(handler, event);
                        if event == PageEvent::Unload {
                            break;
                        }
                    }
                    None => page_open = false,
                },
                event = self.channel_events.recv(), if channel_open => match event {
                    Some(event) => dispatch_channel_event(handler, event),
                    None => channel_open = false,
                },
            }
        }

        tracing::debug!("Event loop finished");
    }
}

/// Invoke the page callback for one event
pub fn dispatch_page_event<H: PageHandler>(handler: &mut H, event: PageEvent) {
    match event {
        PageEvent::Ready => handler.on_ready(),
        PageEvent::Loaded => handler.on_load(),
        PageEvent::Unload => handler.on_unload(),
    }
}

/// Invoke the channel callback for one event
pub fn dispatch_channel_event<H: ChannelHandler>(handler: &mut H, event: ChannelEvent) {
    match event {
        ChannelEvent::Connected => handler.on_connect(),
        ChannelEvent::Message(InboundEvent::NewMessage(payload)) => handler.on_new_message(payload),
        ChannelEvent::ConnectError(reason) => handler.on_connect_error(&reason),
        ChannelEvent::Disconnected(reason) => handler.on_disconnect(&reason),
    }
}
