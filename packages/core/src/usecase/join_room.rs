//! UseCase: ルーム参加
//!
//! 参加ルール:
//! - ルーム ID は 6 文字の英大文字・数字（入力は前後の空白を除去して大文字化）
//! - 座席 2 が他のユーザーで埋まっていれば満室
//! - ホスト自身はゲストとして参加できない
//! - 既に座席 2 にいるユーザーの再参加は何もしない
//! - 座席 1 が空いていれば（放棄されたルーム）ホストとして着席する

use std::sync::Arc;

use tracing::info;

use crate::domain::{Identity, Player, RoomId, RoomPatch, RoomStatus, RoomStore, Seat};

use super::error::SessionError;

/// ルーム参加のユースケース
#[derive(Clone)]
pub struct JoinRoomUseCase {
    store: Arc<dyn RoomStore>,
}

impl JoinRoomUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_code` - ユーザーが入力したルーム ID
    /// * `identity` - 参加するユーザー
    ///
    /// # Returns
    ///
    /// * `Ok((RoomId, Seat))` - 着席したルームと座席
    /// * `Err(SessionError)` - 検証エラー、存在しないルーム、満室など
    pub async fn execute(
        &self,
        room_code: &str,
        identity: &Identity,
    ) -> Result<(RoomId, Seat), SessionError> {
        let id = RoomId::parse(room_code)?;
        let room = self.store.get(&id).await?;

        match room.seat_of(&identity.uid) {
            Some(Seat::Player1) => return Err(SessionError::HostCannotJoin),
            Some(Seat::Player2) => return Ok((id, Seat::Player2)),
            None => {}
        }

        let (seat, patch) = if room.player1.is_none() {
            let status = if room.player2.is_some() {
                RoomStatus::Ready
            } else {
                RoomStatus::Waiting
            };
            let patch = RoomPatch::new()
                .seat(Seat::Player1, Some(&Player::host(identity)))
                .host_id(Some(&identity.uid))
                .status(status)
                .clear_round();
            (Seat::Player1, patch)
        } else if room.player2.is_some() {
            return Err(SessionError::RoomFull);
        } else {
            if room.status != RoomStatus::Waiting {
                return Err(SessionError::InvalidState {
                    action: "join",
                    status: room.status,
                });
            }
            let patch = RoomPatch::new()
                .seat(Seat::Player2, Some(&Player::guest(identity)))
                .guest_id(Some(&identity.uid))
                .status(RoomStatus::Ready);
            (Seat::Player2, patch)
        };

        self.store.merge_update(&id, patch).await?;
        info!("{} joined room {} as {}", identity.uid, id, seat);
        Ok((id, seat))
    }
}
