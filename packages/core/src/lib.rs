//! Typerace core: the room session state machine of a two-player typing
//! race, and the scoring and termination protocol both clients run.
//!
//! Layers:
//! - [`domain`]: room document, value objects, store interfaces
//! - [`metrics`], [`tracker`], [`arbiter`]: pure scoring and decision logic
//! - [`usecase`]: lifecycle transitions, one merge-update each
//! - [`session`]: per-client event loop and round-scoped timers
//! - [`infrastructure`]: in-memory store, leaderboard and paragraph generator
//! - [`practice`]: single-player typing test

pub mod arbiter;
pub mod domain;
pub mod infrastructure;
pub mod metrics;
pub mod practice;
pub mod session;
pub mod tracker;
pub mod usecase;
