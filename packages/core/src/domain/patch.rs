//! Merge-updates for room documents.
//!
//! A [`RoomPatch`] names the fields it touches with dotted paths
//! (`player1.wpm`, `settings.gameDuration`) and leaves every other field of
//! the document alone. Paths are applied in lexical order, so replacing a
//! whole seat (`player1`) happens before any `player1.*` field in the same
//! patch.
//!
//! A patch may carry a [`Precondition`] on the current document. The store
//! checks it under the same lock as the write and commits nothing when it
//! does not hold.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{
    entity::{Player, Room, RoomStatus, Seat, TypingStats, Winner},
    error::PatchError,
    value_object::{GameDuration, ParagraphLength, Timestamp, UserId},
};

/// Value written to one field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum PatchValue {
    Set(Value),
    /// Replaced by the store's own clock when the write is committed
    ServerTimestamp,
}

/// State the document must be in when the write is committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Precondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Timestamp>,
}

impl Precondition {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.start_time.is_none()
    }

    /// # Errors
    ///
    /// [`PatchError::PreconditionFailed`] naming the first field that differs.
    pub fn check(&self, room: &Room) -> Result<(), PatchError> {
        if let Some(expected) = self.status
            && room.status != expected
        {
            return Err(PatchError::PreconditionFailed {
                field: "status",
                expected: expected.to_string(),
                actual: room.status.to_string(),
            });
        }
        if let Some(expected) = self.start_time
            && room.start_time != Some(expected)
        {
            return Err(PatchError::PreconditionFailed {
                field: "startTime",
                expected: expected.to_string(),
                actual: room
                    .start_time
                    .map_or_else(|| "none".to_string(), |t| t.to_string()),
            });
        }
        Ok(())
    }
}

/// A partial update of a [`Room`] document.
///
/// On the wire the precondition sits under `$expect`; every other key is a
/// field path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomPatch {
    #[serde(rename = "$expect", default, skip_serializing_if = "Precondition::is_empty")]
    expect: Precondition,
    #[serde(flatten)]
    fields: BTreeMap<String, PatchValue>,
}

impl RoomPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, path: impl Into<String>, value: Value) -> Self {
        self.fields.insert(path.into(), PatchValue::Set(value));
        self
    }

    pub fn server_timestamp(mut self, path: impl Into<String>) -> Self {
        self.fields.insert(path.into(), PatchValue::ServerTimestamp);
        self
    }

    /// Only commit while the room is in `status`.
    pub fn expect_status(mut self, status: RoomStatus) -> Self {
        self.expect.status = Some(status);
        self
    }

    /// Only commit while `startTime` is `at`.
    pub fn expect_start_time(mut self, at: Timestamp) -> Self {
        self.expect.start_time = Some(at);
        self
    }

    pub fn precondition(&self) -> &Precondition {
        &self.expect
    }

    pub fn status(self, status: RoomStatus) -> Self {
        self.set("status", json!(status))
    }

    pub fn paragraph_text(self, text: Option<&str>) -> Self {
        self.set("paragraphText", json!(text))
    }

    /// Stamp `startTime` with the store's clock.
    pub fn start_time_now(self) -> Self {
        self.server_timestamp("startTime")
    }

    pub fn start_time(self, at: Option<Timestamp>) -> Self {
        self.set("startTime", json!(at))
    }

    pub fn winner(self, winner: Option<Winner>) -> Self {
        self.set("winner", json!(winner))
    }

    pub fn host_id(self, uid: Option<&UserId>) -> Self {
        self.set("hostId", json!(uid))
    }

    pub fn guest_id(self, uid: Option<&UserId>) -> Self {
        self.set("guestId", json!(uid))
    }

    /// Replace a whole seat.
    pub fn seat(self, seat: Seat, player: Option<&Player>) -> Self {
        self.set(seat.field(), json!(player))
    }

    /// Write the live-stat fields of one seat.
    pub fn seat_stats(self, seat: Seat, stats: &TypingStats) -> Self {
        let prefix = seat.field();
        self.set(format!("{prefix}.typedText"), json!(stats.typed_text))
            .set(format!("{prefix}.wpm"), json!(stats.wpm))
            .set(format!("{prefix}.accuracy"), json!(stats.accuracy))
            .set(format!("{prefix}.errors"), json!(stats.errors))
            .set(format!("{prefix}.progress"), json!(stats.progress))
    }

    pub fn reset_seat_stats(self, seat: Seat) -> Self {
        self.seat_stats(seat, &TypingStats::default())
    }

    pub fn seat_ready(self, seat: Seat, ready: bool) -> Self {
        self.set(format!("{}.isReady", seat.field()), json!(ready))
    }

    pub fn paragraph_length(self, length: ParagraphLength) -> Self {
        self.set("settings.paragraphLength", json!(length))
    }

    pub fn game_duration(self, duration: GameDuration) -> Self {
        self.set("settings.gameDuration", json!(duration))
    }

    pub fn include_punctuation(self, enabled: bool) -> Self {
        self.set("settings.includePunctuation", json!(enabled))
    }

    pub fn include_numbers(self, enabled: bool) -> Self {
        self.set("settings.includeNumbers", json!(enabled))
    }

    /// Clear every per-round artifact (`paragraphText`, `startTime`, `winner`).
    pub fn clear_round(self) -> Self {
        self.paragraph_text(None).start_time(None).winner(None)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Apply this patch to `room`, resolving server timestamps to `server_now`.
    ///
    /// The input room is not modified. Invariants are not checked here.
    ///
    /// # Errors
    ///
    /// Returns an error if the precondition does not hold, a path is
    /// malformed, its parent is not an object, or the result is not a valid
    /// room document.
    pub fn apply_to(&self, room: &Room, server_now: Timestamp) -> Result<Room, PatchError> {
        self.expect.check(room)?;
        let mut doc = serde_json::to_value(room).map_err(|e| PatchError::Decode(e.to_string()))?;
        for (path, value) in &self.fields {
            let resolved = match value {
                PatchValue::Set(v) => v.clone(),
                PatchValue::ServerTimestamp => json!(server_now),
            };
            set_path(&mut doc, path, resolved)?;
        }
        serde_json::from_value(doc).map_err(|e| PatchError::Decode(e.to_string()))
    }
}

fn set_path(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(PatchError::InvalidPath(path.to_string()));
    }
    let Some((last, parents)) = segments.split_last() else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };

    let mut cursor = doc;
    for segment in parents {
        cursor = cursor
            .get_mut(*segment)
            .ok_or_else(|| PatchError::MissingParent(path.to_string()))?;
    }
    let Value::Object(map) = cursor else {
        return Err(PatchError::MissingParent(path.to_string()));
    };
    map.insert((*last).to_string(), value);
    Ok(())
}
