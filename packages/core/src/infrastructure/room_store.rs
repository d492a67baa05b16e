//! InMemory Room Document Store 実装
//!
//! HashMap をインメモリ DB として使用し、ルームごとに購読者のチャンネルを
//! 保持します。コミットされた書き込みは全購読者にスナップショットとして
//! 配信されます（値が変わらない書き込みも配信する at-least-once）。
//!
//! 不変条件に違反する merge-update は拒否し、ドキュメントは変更しません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{
    Mutex,
    mpsc::{self, UnboundedSender},
};
use tracing::{debug, info, warn};

use crate::domain::{
    Clock, Room, RoomId, RoomPatch, RoomStore, RoomSubscription, StoreError, SystemClock,
};

struct RoomEntry {
    room: Room,
    subscribers: Vec<UnboundedSender<Room>>,
}

impl RoomEntry {
    /// 現在のスナップショットを配信し、切断済みの購読者を取り除く
    fn notify(&mut self) {
        let room = &self.room;
        self.subscribers.retain(|tx| tx.send(room.clone()).is_ok());
    }
}

/// インメモリ Room Store 実装
pub struct InMemoryRoomStore {
    rooms: Mutex<HashMap<RoomId, RoomEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryRoomStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomStore {
    /// 新しい InMemoryRoomStore を作成（サーバー時刻はシステム時計）
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// `ServerTimestamp` を解決する時計を指定して作成
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    /// 全ルームのスナップショット（作成時刻順）
    pub async fn rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut snapshots: Vec<Room> = rooms.values().map(|entry| entry.room.clone()).collect();
        snapshots.sort_by_key(|room| (room.created_at, room.id.clone()));
        snapshots
    }

    /// 両方の座席が空いたルームを削除する
    ///
    /// 削除されたルームの購読は終了します。
    ///
    /// # Returns
    ///
    /// 削除したルーム ID のリスト
    pub async fn reclaim_abandoned(&self) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().await;
        let abandoned: Vec<RoomId> = rooms
            .iter()
            .filter(|(_, entry)| entry.room.is_abandoned())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &abandoned {
            rooms.remove(id);
            info!("Reclaimed abandoned room {}", id);
        }
        abandoned
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create(&self, room: Room) -> Result<(), StoreError> {
        room.check_invariants()?;
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&room.id) {
            return Err(StoreError::AlreadyExists(room.id));
        }
        debug!("Room {} stored", room.id);
        rooms.insert(
            room.id.clone(),
            RoomEntry {
                room,
                subscribers: Vec::new(),
            },
        );
        Ok(())
    }

    async fn get(&self, id: &RoomId) -> Result<Room, StoreError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(id)
            .map(|entry| entry.room.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn subscribe(&self, id: &RoomId) -> Result<RoomSubscription, StoreError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(entry.room.clone()).is_ok() {
            entry.subscribers.push(tx);
        }
        Ok(rx)
    }

    async fn merge_update(&self, id: &RoomId, patch: RoomPatch) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        let entry = rooms
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let updated = patch
            .apply_to(&entry.room, self.clock.now())
            .map_err(|e| {
                warn!("Rejected update of room {}: {}", id, e);
                StoreError::from(e)
            })?;
        if updated.id != *id {
            warn!("Rejected update of room {}: id is immutable", id);
            return Err(StoreError::Rejected("id is immutable".to_string()));
        }
        updated.check_invariants().map_err(|e| {
            warn!("Rejected update of room {}: {}", id, e);
            StoreError::from(e)
        })?;

        entry.room = updated;
        entry.notify();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Identity, ManualClock, RoomStatus, Seat, Timestamp, TypingStats, UserId,
    };

    fn room() -> Room {
        let host = Identity::new(UserId::new("alice".to_string()).unwrap(), None);
        Room::new(
            RoomId::new("STORE1".to_string()).unwrap(),
            &host,
            Timestamp::new(0),
        )
    }

    fn id() -> RoomId {
        RoomId::new("STORE1".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        // テスト項目: 作成したルームを取得でき、重複作成は拒否される
        // given (前提条件):
        let store = InMemoryRoomStore::new();

        // when (操作):
        store.create(room()).await.unwrap();
        let duplicate = store.create(room()).await;

        // then (期待する結果):
        assert_eq!(store.get(&id()).await.unwrap(), room());
        assert_eq!(duplicate, Err(StoreError::AlreadyExists(id())));
        assert_eq!(store.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_room() {
        // テスト項目: 存在しないルームの取得は NotFound
        // given (前提条件):
        let store = InMemoryRoomStore::new();

        // then (期待する結果):
        assert_eq!(store.get(&id()).await, Err(StoreError::NotFound(id())));
    }

    #[tokio::test]
    async fn test_subscribers_receive_snapshots() {
        // テスト項目: 購読直後に現在のスナップショット、その後は書き込みごとに通知される
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();
        let mut first = store.subscribe(&id()).await.unwrap();
        let mut second = store.subscribe(&id()).await.unwrap();

        // when (操作):
        store
            .merge_update(&id(), RoomPatch::new().seat_ready(Seat::Player1, false))
            .await
            .unwrap();

        // then (期待する結果):
        for rx in [&mut first, &mut second] {
            let initial = rx.recv().await.unwrap();
            assert!(initial.player1.unwrap().is_ready);
            let changed = rx.recv().await.unwrap();
            assert!(!changed.player1.unwrap().is_ready);
        }
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned() {
        // テスト項目: 受信側を破棄した購読者は次の通知で取り除かれる
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();
        let dropped = store.subscribe(&id()).await.unwrap();
        drop(dropped);

        // when (操作):
        let result = store
            .merge_update(&id(), RoomPatch::new().seat_ready(Seat::Player1, true))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let rooms = store.rooms.lock().await;
        assert!(rooms.get(&id()).unwrap().subscribers.is_empty());
    }

    #[tokio::test]
    async fn test_invariant_violation_rejected() {
        // テスト項目: 不変条件に違反する書き込みは拒否され、ドキュメントは変わらない
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();

        // when (操作): 本文なしで countdown にしようとする
        let result = store
            .merge_update(&id(), RoomPatch::new().status(RoomStatus::Countdown))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert_eq!(store.get(&id()).await.unwrap().status, RoomStatus::Waiting);
    }

    #[tokio::test]
    async fn test_patch_into_empty_seat_rejected() {
        // テスト項目: 空席への統計書き込みは拒否される
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();

        // when (操作):
        let result = store
            .merge_update(
                &id(),
                RoomPatch::new().seat_stats(Seat::Player2, &TypingStats::default()),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_failed_precondition_is_stale_and_not_notified() {
        // テスト項目: 前提条件を満たさない書き込みは Stale で拒否され、購読者にも通知されない
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();
        let mut rx = store.subscribe(&id()).await.unwrap();
        rx.recv().await.unwrap();

        // when (操作):
        let result = store
            .merge_update(
                &id(),
                RoomPatch::new()
                    .expect_status(RoomStatus::Playing)
                    .seat_ready(Seat::Player1, false),
            )
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(StoreError::Stale(_))));
        assert!(store.get(&id()).await.unwrap().player1.unwrap().is_ready);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_server_timestamp_uses_store_clock() {
        // テスト項目: ServerTimestamp はストアの時計で打刻される
        // given (前提条件):
        let clock = Arc::new(ManualClock::new(Timestamp::new(42_000)));
        let store = InMemoryRoomStore::with_clock(clock);
        let mut countdown = room();
        countdown.status = RoomStatus::Countdown;
        countdown.paragraph_text = Some("abc".to_string());
        store.create(countdown).await.unwrap();

        // when (操作):
        store
            .merge_update(
                &id(),
                RoomPatch::new()
                    .status(RoomStatus::Playing)
                    .start_time_now(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        let room = store.get(&id()).await.unwrap();
        assert_eq!(room.start_time, Some(Timestamp::new(42_000)));
    }

    #[tokio::test]
    async fn test_reclaim_abandoned_rooms() {
        // テスト項目: 両方の座席が空いたルームだけが削除され、購読が終了する
        // given (前提条件):
        let store = InMemoryRoomStore::new();
        store.create(room()).await.unwrap();
        let bob = Identity::new(UserId::new("bob".to_string()).unwrap(), None);
        let other = Room::new(
            RoomId::new("STORE2".to_string()).unwrap(),
            &bob,
            Timestamp::new(0),
        );
        store.create(other).await.unwrap();
        let mut rx = store.subscribe(&id()).await.unwrap();
        store
            .merge_update(
                &id(),
                RoomPatch::new().seat(Seat::Player1, None).host_id(None),
            )
            .await
            .unwrap();

        // when (操作):
        let reclaimed = store.reclaim_abandoned().await;

        // then (期待する結果):
        assert_eq!(reclaimed, vec![id()]);
        assert_eq!(store.room_count().await, 1);
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
