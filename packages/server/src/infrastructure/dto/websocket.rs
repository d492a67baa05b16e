//! WebSocket frames pushed to room subscribers.

use serde::{Deserialize, Serialize};
use typerace_core::domain::{Room, RoomId};

/// One text frame of a room subscription.
///
/// The first frame is always the current snapshot. `room-closed` is the last
/// frame and means the room no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoomFrame {
    Snapshot { room: Room },
    #[serde(rename_all = "camelCase")]
    RoomClosed { room_id: RoomId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use typerace_core::domain::{Identity, Timestamp, UserId};

    #[test]
    fn test_snapshot_frame_is_tagged() {
        // テスト項目: スナップショットフレームが type タグ付きの JSON になる
        // given (前提条件):
        let host = Identity::new(UserId::new("alice".to_string()).unwrap(), None);
        let room = Room::new(
            RoomId::parse("ABC123").unwrap(),
            &host,
            Timestamp::new(1_700_000_000_000),
        );

        // when (操作):
        let json = serde_json::to_value(RoomFrame::Snapshot { room }).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["room"]["id"], "ABC123");
        assert_eq!(json["room"]["player1"]["name"], "Player 1");
    }

    #[test]
    fn test_room_closed_frame_round_trips() {
        // テスト項目: room-closed フレームを復元できる
        // given (前提条件):
        let raw = r#"{"type":"room-closed","roomId":"ABC123"}"#;

        // when (操作):
        let frame: RoomFrame = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            RoomFrame::RoomClosed {
                room_id: RoomId::parse("ABC123").unwrap()
            }
        );
    }
}
