//! Collaborator interfaces the core depends on.
//!
//! The core never talks to storage or text generation directly; it goes
//! through these traits so both in-process and remote implementations can be
//! plugged in (dependency inversion).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use super::{
    entity::{GameSettings, Room},
    error::{GeneratorError, StoreError},
    patch::RoomPatch,
    result::{GameResult, UserProfile},
    value_object::{ParagraphLength, RoomId},
};

/// Stream of room snapshots. The current snapshot is delivered first, then
/// one snapshot per committed change. Dropping the receiver unsubscribes;
/// the stream ends when the room is removed.
pub type RoomSubscription = UnboundedReceiver<Room>;

/// Shared room document store.
///
/// Writes are last-write-wins merges; every committed write is pushed to all
/// subscribers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn create(&self, room: Room) -> Result<(), StoreError>;

    async fn get(&self, id: &RoomId) -> Result<Room, StoreError>;

    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError>;

    async fn merge_update(&self, id: &RoomId, patch: RoomPatch) -> Result<(), StoreError>;
}

/// Historical results and per-user best scores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Append one result and raise the user's watermarks atomically.
    async fn record_result(&self, result: GameResult) -> Result<UserProfile, StoreError>;
}

/// Input of the paragraph generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphRequest {
    pub word_count: ParagraphLength,
    pub include_punctuation: bool,
    pub include_numbers: bool,
}

impl From<&GameSettings> for ParagraphRequest {
    fn from(settings: &GameSettings) -> Self {
        Self {
            word_count: settings.paragraph_length,
            include_punctuation: settings.include_punctuation,
            include_numbers: settings.include_numbers,
        }
    }
}

/// External text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParagraphGenerator: Send + Sync {
    async fn generate(&self, request: ParagraphRequest) -> Result<String, GeneratorError>;
}
