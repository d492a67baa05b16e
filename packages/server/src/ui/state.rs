//! Server state.

use std::sync::Arc;

use typerace_core::infrastructure::{InMemoryLeaderboard, InMemoryRoomStore};

/// Shared application state
#[derive(Default)]
pub struct AppState {
    /// Room documents and their subscribers
    pub store: Arc<InMemoryRoomStore>,
    /// Game results and user profiles
    pub leaderboard: Arc<InMemoryLeaderboard>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryRoomStore>, leaderboard: Arc<InMemoryLeaderboard>) -> Self {
        Self { store, leaderboard }
    }
}
