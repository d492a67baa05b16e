//! Finished-game results and user profiles kept by the leaderboard store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_object::{Timestamp, UserId};

/// Where a result was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Two-player race
    Duel,
    /// Single-player practice test
    Test,
}

/// One historical result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: Uuid,
    pub uid: UserId,
    pub name: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub mode: GameMode,
    pub recorded_at: Timestamp,
}

impl GameResult {
    pub fn new(
        uid: UserId,
        name: String,
        wpm: u32,
        accuracy: u32,
        mode: GameMode,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            uid,
            name,
            wpm,
            accuracy,
            mode,
            recorded_at,
        }
    }
}

/// Per-user best-so-far watermarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: UserId,
    pub display_name: String,
    pub best_wpm: u32,
    pub best_accuracy: u32,
    pub games_played: u32,
    pub last_played: Timestamp,
}

impl UserProfile {
    /// Profile created by a user's first result.
    pub fn first(result: &GameResult) -> Self {
        Self {
            uid: result.uid.clone(),
            display_name: result.name.clone(),
            best_wpm: result.wpm,
            best_accuracy: result.accuracy,
            games_played: 1,
            last_played: result.recorded_at,
        }
    }

    /// Raise the watermarks with a new result. Watermarks never decrease.
    pub fn absorb(&mut self, result: &GameResult) {
        self.best_wpm = self.best_wpm.max(result.wpm);
        self.best_accuracy = self.best_accuracy.max(result.accuracy);
        self.games_played += 1;
        self.last_played = self.last_played.max(result.recorded_at);
    }
}
