//! UseCase: 入力の記録
//!
//! ローカルのトラッカーを先に更新し、その後で自分の座席の統計だけを
//! ルームに書き込みます。書き込みの失敗はログに残すだけで、次の入力が
//! 最新の状態をまとめて送り直します。
//!
//! 書き込みには「playing かつ同じ startTime」という前提条件を付けるため、
//! 手元のスナップショットが古くても終了済みのラウンドには書き込まれません。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::{
        Clock, Room, RoomPatch, RoomStatus, RoomStore, Seat, StoreError, Timestamp, TypingStats,
        UserId,
    },
    tracker::{InputEdit, TypingTracker},
};

use super::{error::SessionError, require_seat, require_status};

#[derive(Clone)]
pub struct RecordTypingUseCase {
    store: Arc<dyn RoomStore>,
    clock: Arc<dyn Clock>,
}

impl RecordTypingUseCase {
    pub fn new(store: Arc<dyn RoomStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 座席とラウンドの開始時刻、または入力を受け付けない理由
    fn round_in_progress(
        &self,
        room: &Room,
        uid: &UserId,
    ) -> Result<(Seat, Timestamp, Timestamp), SessionError> {
        let seat = require_seat(room, uid)?;
        require_status(room, &[RoomStatus::Playing], "type")?;
        let Some(start_time) = room.start_time else {
            return Err(SessionError::InvalidState {
                action: "type",
                status: room.status,
            });
        };
        let now = self.clock.now();
        if now.millis_since(start_time) >= room.settings.game_duration.millis() {
            return Err(SessionError::TimeUp);
        }
        Ok((seat, start_time, now))
    }

    /// 同じラウンドの playing 中にだけ反映される
    async fn write(&self, room: &Room, seat: Seat, start_time: Timestamp, stats: &TypingStats) {
        let patch = RoomPatch::new()
            .expect_status(RoomStatus::Playing)
            .expect_start_time(start_time)
            .seat_stats(seat, stats);
        match self.store.merge_update(&room.id, patch).await {
            Ok(()) => {}
            Err(StoreError::Stale(reason)) => {
                debug!("Dropped stats for {} in room {}: {}", seat, room.id, reason);
            }
            Err(e) => warn!("Failed to write stats for {} in room {}: {}", seat, room.id, e),
        }
    }

    /// 入力を適用して統計を書き込む
    ///
    /// # Arguments
    ///
    /// * `room` - クライアントが最後に受け取ったルームのスナップショット
    /// * `tracker` - このラウンドのローカルトラッカー
    ///
    /// # Returns
    ///
    /// * `Ok(TypingStats)` - ローカルの最新統計（書き込みの成否に関わらず）
    /// * `Err(SessionError)` - playing 以外、時間切れ、参加者でない
    pub async fn execute(
        &self,
        room: &Room,
        uid: &UserId,
        tracker: &mut TypingTracker,
        edit: &InputEdit,
    ) -> Result<TypingStats, SessionError> {
        let (seat, start_time, now) = self.round_in_progress(room, uid)?;
        let stats = tracker.input(edit, now.seconds_since(start_time)).clone();
        self.write(room, seat, start_time, &stats).await;
        Ok(stats)
    }

    /// 経過時間だけを進めて WPM を再計算する
    ///
    /// 値が変わったときだけ書き込み、`Some(stats)` を返します。
    /// 本文を打ち終えたプレイヤーの WPM は完走時点の値で固定されます。
    pub async fn refresh(
        &self,
        room: &Room,
        uid: &UserId,
        tracker: &mut TypingTracker,
    ) -> Result<Option<TypingStats>, SessionError> {
        let (seat, start_time, now) = self.round_in_progress(room, uid)?;
        if tracker.is_finished() || !tracker.refresh(now.seconds_since(start_time)) {
            return Ok(None);
        }
        let stats = tracker.stats().clone();
        self.write(room, seat, start_time, &stats).await;
        Ok(Some(stats))
    }
}
