//! WebSocket transport for the real-time channel.
//!
//! Each open channel is one tokio task owning the socket. The handle only
//! queues commands to it, so `emit` and `disconnect` never block. The task
//! keeps dialing until it is told to stop: every failed attempt is reported
//! as [`ChannelEvent::ConnectError`], every lost link as
//! [`ChannelEvent::Disconnected`].

use std::collections::VecDeque;

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use welcome_shared::protocol::{OutboundEvent, decode_inbound, encode_outbound};

use super::{Channel, ChannelError, ChannelEvent, Connector, Endpoint, TransportOptions};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Install the `ring` TLS provider as the process default.
///
/// Calling it more than once is harmless.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("TLS crypto provider already installed");
    }
}

enum Command {
    Emit(String),
    Disconnect,
}

enum LinkEnd {
    /// Told to stop, or nobody listens to events anymore
    Stopped,
    /// The link broke; the transport dials again
    Lost(String),
}

/// Opens [`WebSocketChannel`]s that report to one event queue.
pub struct WebSocketConnector {
    options: TransportOptions,
    events: mpsc::UnboundedSender<ChannelEvent>,
}

impl WebSocketConnector {
    pub fn new(options: TransportOptions, events: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        Self { options, events }
    }
}

impl Connector for WebSocketConnector {
    type Channel = WebSocketChannel;

    /// Spawn the transport task. Must be called inside a tokio runtime.
    fn open(&mut self, endpoint: &Endpoint) -> WebSocketChannel {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let url = endpoint.websocket_url();
        tracing::info!("Opening channel to {}", url);

        tokio::spawn(run_transport(
            url,
            self.options.clone(),
            commands_rx,
            self.events.clone(),
        ));

        WebSocketChannel {
            commands: commands_tx,
            closed: false,
        }
    }
}

/// Handle to a running transport task. Dropping it stops the task.
pub struct WebSocketChannel {
    commands: mpsc::UnboundedSender<Command>,
    closed: bool,
}

impl Channel for WebSocketChannel {
    fn emit(&mut self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }

        let frame = encode_outbound(&event).map_err(|e| ChannelError::Encode(e.to_string()))?;
        self.commands.send(Command::Emit(frame)).map_err(|_| {
            self.closed = true;
            ChannelError::Closed
        })
    }

    fn disconnect(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // The task may already be gone
        let _ = self.commands.send(Command::Disconnect);
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

async fn run_transport(
    url: String,
    options: TransportOptions,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<ChannelEvent>,
) {
    // Frames emitted while no link is up
    let mut pending: VecDeque<String> = VecDeque::new();

    loop {
        tracing::debug!("Connecting to {}", url);
        let attempt = tokio::select! {
            result = tokio::time::timeout(options.connect_timeout, connect_async(url.as_str())) => result,
            _ = wait_for_stop(&mut pending, &mut commands) => break,
        };

        let report = match attempt {
            Ok(Ok((socket, _response))) => {
                tracing::info!("Connected to {}", url);
                if events.send(ChannelEvent::Connected).is_err() {
                    break;
                }
                match run_link(socket, &mut pending, &mut commands, &events).await {
                    LinkEnd::Stopped => break,
                    LinkEnd::Lost(reason) => ChannelEvent::Disconnected(reason),
                }
            }
            Ok(Err(e)) => ChannelEvent::ConnectError(e.to_string()),
            Err(_) => ChannelEvent::ConnectError(format!(
                "Connection timed out after {:?}",
                options.connect_timeout
            )),
        };

        if events.send(report).is_err() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(options.reconnect_delay) => {}
            _ = wait_for_stop(&mut pending, &mut commands) => break,
        }
    }

    tracing::debug!("Transport for {} stopped", url);
}

/// Buffer emitted frames until a disconnect is requested or the handle is
/// dropped.
async fn wait_for_stop(
    pending: &mut VecDeque<String>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Emit(frame) => pending.push_back(frame),
            Command::Disconnect => return,
        }
    }
}

async fn run_link(
    socket: Socket,
    pending: &mut VecDeque<String>,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    events: &mpsc::UnboundedSender<ChannelEvent>,
) -> LinkEnd {
    let (mut write, mut read) = socket.split();

    while let Some(frame) = pending.pop_front() {
        if let Err(e) = write.send(Message::Text(frame.clone().into())).await {
            pending.push_front(frame);
            return LinkEnd::Lost(e.to_string());
        }
    }

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Emit(frame)) => {
                    if let Err(e) = write.send(Message::Text(frame.clone().into())).await {
                        pending.push_back(frame);
                        return LinkEnd::Lost(e.to_string());
                    }
                }
                Some(Command::Disconnect) | None => {
                    if let Err(e) = write.close().await {
                        tracing::debug!("Failed to close socket cleanly: {}", e);
                    }
                    return LinkEnd::Stopped;
                }
            },
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => match decode_inbound(&text) {
                    Ok(event) => {
                        if events.send(ChannelEvent::Message(event)).is_err() {
                            return LinkEnd::Stopped;
                        }
                    }
                    Err(e) => tracing::debug!("Dropping frame '{}': {}", text.as_str(), e),
                },
                Some(Ok(Message::Close(_))) => {
                    return LinkEnd::Lost("Server closed the connection".to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return LinkEnd::Lost(e.to_string()),
                None => return LinkEnd::Lost("Connection stream ended".to_string()),
            },
        }
    }
}
