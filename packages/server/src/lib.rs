//! Typerace room host.
//!
//! Exposes the shared room documents and the leaderboard over HTTP, and
//! streams room snapshots to subscribers over WebSocket. Game rules live in
//! the clients; the host only stores, validates and fans out documents.

pub mod error;
pub mod infrastructure;
pub mod ui;

// Re-export entry points
pub use ui::{ServerConfig, run};
