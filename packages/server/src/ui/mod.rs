//! UI layer: HTTP and WebSocket entry points.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{ServerConfig, build_app, run, spawn_sweeper};
