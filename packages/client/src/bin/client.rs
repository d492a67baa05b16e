//! Typerace terminal client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin typerace-client -- --name Alice create
//! cargo run --bin typerace-client -- --name Bob join ABC123
//! ```

use clap::Parser;
use typerace_client::cli::Cli;
use typerace_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; the prompt shares the terminal, so stay quiet by default
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let code = match typerace_client::run_client(cli).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Client error: {}", e);
            eprintln!("Error: {e}");
            1
        }
    };
    // The line reader blocks in readline; exit instead of waiting for it
    std::process::exit(code);
}
