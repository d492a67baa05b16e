//! Typerace terminal client.
//!
//! Talks to a room host through remote implementations of the core store
//! traits and drives a [`typerace_core::session::RoomSession`] from prompt
//! lines.

pub mod cli;
pub mod error;
pub mod infrastructure;
pub mod ui;

// Re-export entry points
pub use ui::run_client;
