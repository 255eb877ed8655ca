//! The welcome notifier.
//!
//! Wires page and channel callbacks to one display region: a placeholder on
//! load, the pushed welcome text on every `newMessage`, and a connection
//! error counter that closes the channel at [`MAX_CONNECT_ERRORS`].

use welcome_shared::protocol::{OutboundEvent, WelcomePayload};

use crate::{
    channel::{Channel, Connector, DEFAULT_SOCKET_PATH, Endpoint},
    display::{DisplayRegion, MarkupPolicy, Paragraph},
    event_loop::{ChannelHandler, PageHandler},
    page::Location,
    session::{ConnectionState, ErrorOutcome, MAX_CONNECT_ERRORS, Session},
};

/// Settings of one notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Where the page was served from
    pub location: Location,
    /// Socket path on the page origin
    pub socket_path: String,
    pub markup: MarkupPolicy,
}

impl NotifierConfig {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            markup: MarkupPolicy::default(),
        }
    }
}

pub struct WelcomeNotifier<R, K>
where
    R: DisplayRegion,
    K: Connector,
{
    config: NotifierConfig,
    region: R,
    connector: K,
    session: Option<Session<K::Channel>>,
}

impl<R, K> WelcomeNotifier<R, K>
where
    R: DisplayRegion,
    K: Connector,
{
    pub fn new(config: NotifierConfig, region: R, connector: K) -> Self {
        Self {
            config,
            region,
            connector,
            session: None,
        }
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    /// The connection of this page load, once the page is ready
    pub fn session(&self) -> Option<&Session<K::Channel>> {
        self.session.as_ref()
    }

    /// Connection state; `Idle` before the page is ready and after it unloaded
    pub fn state(&self) -> ConnectionState {
        self.session
            .as_ref()
            .map_or(ConnectionState::Idle, |session| session.state())
    }

    fn show(&mut self, paragraph: Paragraph) {
        let content = paragraph.render(self.config.markup);
        tracing::debug!("Updating region '{}'", self.region.name());
        self.region.replace(content);
    }

    /// Session that still accepts events
    fn live_session(&mut self) -> Option<&mut Session<K::Channel>> {
        self.session.as_mut().filter(|session| !session.is_closed())
    }
}

impl<R, K> PageHandler for WelcomeNotifier<R, K>
where
    R: DisplayRegion,
    K: Connector,
{
    fn on_ready(&mut self) {
        if self.session.is_some() {
            tracing::warn!("Page is already ready; keeping the existing connection");
            return;
        }

        let endpoint = Endpoint::secure(self.config.location.clone(), &self.config.socket_path);
        tracing::info!("Connecting to {}", endpoint.target_url());
        let channel = self.connector.open(&endpoint);
        let mut session = Session::open(channel, endpoint);

        // The link may not be up yet; the channel queues the request
        if let Err(e) = session.channel_mut().emit(OutboundEvent::NewMessage) {
            tracing::warn!("Failed to request welcome message: {}", e);
        }

        self.session = Some(session);
    }

    fn on_load(&mut self) {
        self.show(Paragraph::placeholder());
    }

    fn on_unload(&mut self) {
        let Some(mut session) = self.session.take() else {
            tracing::debug!("Page unloading before it was ready");
            return;
        };

        tracing::info!(
            "Leaving page (connection {:?}, {} connection error(s))",
            session.state(),
            session.error_count()
        );
        session.close();
    }
}

impl<R, K> ChannelHandler for WelcomeNotifier<R, K>
where
    R: DisplayRegion,
    K: Connector,
{
    fn on_connect(&mut self) {
        if let Some(session) = self.live_session()
            && session.mark_connected()
        {
            tracing::info!("Connected to {}", session.endpoint().target_url());
        }
    }

    fn on_new_message(&mut self, payload: WelcomePayload) {
        if self.live_session().is_none() {
            tracing::debug!("Ignoring message on a closed connection");
            return;
        }

        let Some(text) = payload.message_text() else {
            tracing::warn!("Received newMessage without a message; display unchanged");
            return;
        };

        tracing::info!("Welcome message = '{}'", text);
        self.show(Paragraph::new(text));
    }

    fn on_connect_error(&mut self, reason: &str) {
        let Some(session) = self.live_session() else {
            tracing::debug!("Ignoring connection error on a closed connection: {}", reason);
            return;
        };

        tracing::warn!("Error connecting to server: {}", reason);
        match session.record_connect_error() {
            ErrorOutcome::Counted(count) => {
                tracing::debug!("Connection errors: {}/{}", count, MAX_CONNECT_ERRORS);
            }
            ErrorOutcome::LimitReached => {
                tracing::error!("Server unreachable, closing socket...");
                session.close();
                tracing::info!("Socket closed");
            }
            ErrorOutcome::Ignored => {}
        }
    }

    fn on_disconnect(&mut self, reason: &str) {
        if let Some(session) = self.live_session()
            && session.mark_disconnected()
        {
            tracing::warn!("Connection lost: {}", reason);
        }
    }
}
