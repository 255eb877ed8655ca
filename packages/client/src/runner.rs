//! Notifier execution: wires the transport, the display and the event loop.

use tokio::sync::mpsc;

use crate::{
    channel::{TransportOptions, WebSocketConnector, websocket::install_crypto_provider},
    display::TerminalRegion,
    error::ClientError,
    event_loop::EventLoop,
    notifier::{NotifierConfig, WelcomeNotifier},
    page::PageEvent,
};

/// Run the notifier until the page is unloaded (Ctrl+C).
///
/// The page goes through `Ready` then `Loaded` right away. Unloading the
/// page disconnects the channel.
pub async fn run_notifier(
    config: NotifierConfig,
    region_name: &str,
    options: TransportOptions,
) -> Result<(), ClientError> {
    install_crypto_provider();

    let (page_tx, page_rx) = mpsc::unbounded_channel();
    let (channel_tx, channel_rx) = mpsc::unbounded_channel();

    let connector = WebSocketConnector::new(options, channel_tx);
    let region = TerminalRegion::new(region_name);
    let mut notifier = WelcomeNotifier::new(config, region, connector);

    for event in [PageEvent::Ready, PageEvent::Loaded] {
        page_tx
            .send(event)
            .map_err(|e| ClientError::Runtime(e.to_string()))?;
    }

    let unload = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Interrupted"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
        // The loop may already be gone
        let _ = page_tx.send(PageEvent::Unload);
    });

    EventLoop::new(page_rx, channel_rx).run(&mut notifier).await;
    unload.abort();

    Ok(())
}
