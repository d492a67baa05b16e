//! UseCase: 再戦（finished → ready）
//!
//! ラウンドの成果物を消去し、両者の統計をリセットします。ホストは準備完了、
//! ゲストは未準備に戻ります。

use std::sync::Arc;

use tracing::info;

use crate::domain::{RoomId, RoomPatch, RoomStatus, RoomStore, Seat, UserId};

use super::{error::SessionError, require_host, require_status};

#[derive(Clone)]
pub struct RematchUseCase {
    store: Arc<dyn RoomStore>,
}

impl RematchUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: &RoomId, uid: &UserId) -> Result<(), SessionError> {
        let room = self.store.get(id).await?;
        require_host(&room, uid, "request a rematch")?;
        require_status(&room, &[RoomStatus::Finished], "request a rematch")?;

        let mut patch = RoomPatch::new()
            .clear_round()
            .reset_seat_stats(Seat::Player1)
            .seat_ready(Seat::Player1, true);
        patch = if room.player2.is_some() {
            patch
                .status(RoomStatus::Ready)
                .reset_seat_stats(Seat::Player2)
                .seat_ready(Seat::Player2, false)
        } else {
            patch.status(RoomStatus::Waiting)
        };

        self.store.merge_update(id, patch).await?;
        info!("Room {} reset for a rematch", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Room, Timestamp, Winner},
        usecase::test_support::{room_id, seated_room, store_with, uid},
    };

    fn finished_room() -> Room {
        let mut room = seated_room(RoomStatus::Finished, true);
        room.paragraph_text = Some("hello".to_string());
        room.start_time = Some(Timestamp::new(1));
        room.winner = Some(Winner::Player2);
        for player in [room.player1.as_mut(), room.player2.as_mut()]
            .into_iter()
            .flatten()
        {
            player.typed_text = "hel".to_string();
            player.wpm = 40;
            player.progress = 60;
        }
        room
    }

    #[tokio::test]
    async fn test_rematch_resets_round() {
        // テスト項目: 再戦で本文・開始時刻・勝者が消去され、統計と準備状態がリセットされる
        // given (前提条件):
        let (store, _) = store_with(finished_room()).await;
        let usecase = RematchUseCase::new(store.clone());

        // when (操作):
        usecase.execute(&room_id(), &uid("alice")).await.unwrap();

        // then (期待する結果):
        let room = store.get(&room_id()).await.unwrap();
        assert_eq!(room.status, RoomStatus::Ready);
        assert!(room.paragraph_text.is_none());
        assert!(room.start_time.is_none());
        assert!(room.winner.is_none());
        let host = room.player1.unwrap();
        let guest = room.player2.unwrap();
        assert_eq!(host.typed_text, "");
        assert_eq!(guest.typed_text, "");
        assert_eq!(guest.wpm, 0);
        assert_eq!(guest.accuracy, 100);
        assert!(host.is_ready);
        assert!(!guest.is_ready);
    }

    #[tokio::test]
    async fn test_guest_cannot_rematch() {
        // テスト項目: ゲストは再戦を要求できない
        // given (前提条件):
        let (store, _) = store_with(finished_room()).await;
        let usecase = RematchUseCase::new(store.clone());

        // when (操作):
        let result = usecase.execute(&room_id(), &uid("bob")).await;

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::NotHost("request a rematch")));
        assert_eq!(
            store.get(&room_id()).await.unwrap().status,
            RoomStatus::Finished
        );
    }

    #[tokio::test]
    async fn test_rematch_without_guest_waits() {
        // テスト項目: ゲストが不在なら再戦後は waiting になり、座席 1 だけがリセットされる
        // given (前提条件):
        let mut room = finished_room();
        room.player2 = None;
        room.guest_id = None;
        let (store, _) = store_with(room).await;
        let usecase = RematchUseCase::new(store.clone());

        // when (操作):
        usecase.execute(&room_id(), &uid("alice")).await.unwrap();

        // then (期待する結果):
        let room = store.get(&room_id()).await.unwrap();
        assert_eq!(room.status, RoomStatus::Waiting);
        assert!(room.player2.is_none());
        assert_eq!(room.player1.unwrap().wpm, 0);
    }
}
