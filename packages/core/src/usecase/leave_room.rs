//! UseCase: ルーム退出
//!
//! 退出した座席を空け、ラウンドの成果物（本文・開始時刻・勝者）を消去して
//! `waiting` に戻します。ホストが退出しゲストが残っている場合は、ゲストを
//! 座席 1 に昇格させます（座席はそのままで、占有者の入れ替え）。

use std::sync::Arc;

use tracing::info;

use crate::domain::{RoomId, RoomPatch, RoomStatus, RoomStore, Seat, UserId};

use super::error::SessionError;

/// ルーム退出のユースケース
#[derive(Clone)]
pub struct LeaveRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl LeaveRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// ルーム退出を実行
    ///
    /// 既に座席を持たないユーザーの退出は何もしません。
    pub async fn execute(&self, id: &RoomId, uid: &UserId) -> Result<(), SessionError> {
        let room = self.store.get(id).await?;
        let Some(seat) = room.seat_of(uid) else {
            return Ok(());
        };

        let patch = RoomPatch::new().status(RoomStatus::Waiting).clear_round();
        let patch = match (seat, room.player2.as_ref()) {
            (Seat::Player1, Some(guest)) => {
                let mut promoted = guest.clone();
                promoted.is_host = true;
                promoted.is_ready = true;
                promoted.reset_stats();
                info!("{} promoted to host of room {}", promoted.uid, id);
                patch
                    .seat(Seat::Player1, Some(&promoted))
                    .host_id(Some(&promoted.uid))
                    .seat(Seat::Player2, None)
                    .guest_id(None)
            }
            (Seat::Player1, None) => patch.seat(Seat::Player1, None).host_id(None),
            (Seat::Player2, _) => patch
                .seat(Seat::Player2, None)
                .guest_id(None)
                .reset_seat_stats(Seat::Player1)
                .seat_ready(Seat::Player1, true),
        };

        self.store.merge_update(id, patch).await?;
        info!("{} left room {}", uid, id);
        Ok(())
    }
}
