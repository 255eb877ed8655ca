//! Welcome notifier client.
//!
//! Shows "Waiting for user..." and then every welcome message the server at
//! `https://<domain>:<port>` pushes. Gives up on the server after three
//! connection errors but keeps the last message on screen.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin welcome-client -- --domain door.local --port 3000
//! cargo run --bin welcome-client -- -d 10.0.0.5 -p 3000 --escape-markup
//! ```

use std::time::Duration;

use clap::Parser;

use welcome_client::{
    NotifierConfig,
    channel::{DEFAULT_SOCKET_PATH, TransportOptions},
    display::{DEFAULT_REGION, MarkupPolicy},
    page::Location,
    run_notifier,
};
use welcome_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "welcome-client")]
#[command(about = "Displays the welcome message pushed by the access server", long_about = None)]
struct Args {
    /// Domain the page is served from
    #[arg(short = 'd', long, default_value = "127.0.0.1")]
    domain: String,

    /// Port the page is served from
    #[arg(short = 'p', long, default_value = "3000")]
    port: u16,

    /// WebSocket path on the page origin
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    path: String,

    /// Name of the display region
    #[arg(short = 'r', long, default_value = DEFAULT_REGION)]
    region: String,

    /// Delay between connect attempts in milliseconds
    #[arg(long, default_value = "1000")]
    reconnect_delay_ms: u64,

    /// Time a connect attempt may take in milliseconds
    #[arg(long, default_value = "20000")]
    connect_timeout_ms: u64,

    /// Show markup in messages literally instead of rendering it
    #[arg(long)]
    escape_markup: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let location = match Location::new(args.domain, args.port) {
        Ok(location) => location,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut config = NotifierConfig::new(location);
    config.socket_path = args.path;
    if args.escape_markup {
        config.markup = MarkupPolicy::Escaped;
    }
    let options = TransportOptions {
        reconnect_delay: Duration::from_millis(args.reconnect_delay_ms),
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
    };

    if let Err(e) = run_notifier(config, &args.region, options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
