//! Tandem session coordinator server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tandem-server
//! cargo run --bin tandem-server -- --host 0.0.0.0 --port 3000 --max-players 4
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use tandem_server::{
    domain::Capacity,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{Server, ServerConfig},
};
use tandem_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "tandem-server")]
#[command(about = "Session coordinator for host-authoritative multiplayer rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seats per room
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
    max_players: u8,

    /// Empty rooms older than this many seconds are reclaimed
    #[arg(long, default_value_t = 21600)]
    room_idle_timeout_secs: u64,

    /// Seconds between two room sweeps
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Server (UseCases and AppState are wired inside)

    // 1. Create Repository (in-memory Room Store)
    let capacity = match Capacity::new(usize::from(args.max_players)) {
        Ok(capacity) => capacity,
        Err(e) => {
            tracing::error!("Invalid --max-players: {}", e);
            std::process::exit(1);
        }
    };
    let repository = Arc::new(InMemoryRoomRepository::new(capacity));
    tracing::info!("Rooms hold up to {} players", capacity.value());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create and run the server
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        room_idle_timeout: Duration::from_secs(args.room_idle_timeout_secs),
        sweep_interval: Duration::from_secs(args.sweep_interval_secs),
    };
    let server = Server::new(config, repository, message_pusher, Arc::new(SystemClock));
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
