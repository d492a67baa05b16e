//! HTTP API DTOs.

use serde::{Deserialize, Serialize};
use typerace_core::domain::{Room, RoomStatus};
use typerace_shared::time::timestamp_to_rfc3339;

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub status: RoomStatus,
    pub players: Vec<String>,
    pub created_at: String, // RFC 3339
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            status: room.status,
            players: [&room.player1, &room.player2]
                .into_iter()
                .flatten()
                .map(|p| p.name.clone())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
