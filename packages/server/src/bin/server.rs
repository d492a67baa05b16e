//! Typerace room host.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin typerace-server -- --port 8080
//! ```

use std::time::Duration;

use clap::Parser;
use typerace_server::ServerConfig;
use typerace_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "typerace-server", version, about = "Typerace room host")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Seconds between sweeps of abandoned rooms
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        sweep_interval: Duration::from_secs(args.sweep_interval_secs.max(1)),
    };

    // Run the server
    if let Err(e) = typerace_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
