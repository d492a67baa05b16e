//! InMemory Leaderboard 実装
//!
//! 結果の追加と最高記録の更新は同じロックの中で行います
//! （スカラーの最大値に対する compare-and-update を原子的にするため）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{GameResult, LeaderboardStore, StoreError, UserId, UserProfile};

#[derive(Default)]
struct Ledger {
    results: Vec<GameResult>,
    profiles: HashMap<UserId, UserProfile>,
}

/// インメモリ Leaderboard 実装
#[derive(Default)]
pub struct InMemoryLeaderboard {
    ledger: Mutex<Ledger>,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn profile(&self, uid: &UserId) -> Option<UserProfile> {
        self.ledger.lock().await.profiles.get(uid).cloned()
    }

    /// 記録済みの全結果（古い順）
    pub async fn results(&self) -> Vec<GameResult> {
        self.ledger.lock().await.results.clone()
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboard {
    async fn record_result(&self, result: GameResult) -> Result<UserProfile, StoreError> {
        let mut ledger = self.ledger.lock().await;
        let profile = ledger
            .profiles
            .entry(result.uid.clone())
            .and_modify(|profile| profile.absorb(&result))
            .or_insert_with(|| UserProfile::first(&result))
            .clone();
        ledger.results.push(result);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{GameMode, Timestamp};

    fn result(uid: &str, wpm: u32, accuracy: u32, at: i64) -> GameResult {
        GameResult::new(
            UserId::new(uid.to_string()).unwrap(),
            uid.to_string(),
            wpm,
            accuracy,
            GameMode::Duel,
            Timestamp::new(at),
        )
    }

    #[tokio::test]
    async fn test_watermarks_never_decrease() {
        // テスト項目: 最高 WPM と最高正確性は別々に最大値が保たれる
        // given (前提条件):
        let leaderboard = InMemoryLeaderboard::new();

        // when (操作):
        leaderboard.record_result(result("alice", 60, 90, 1)).await.unwrap();
        let profile = leaderboard
            .record_result(result("alice", 45, 98, 2))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(profile.best_wpm, 60);
        assert_eq!(profile.best_accuracy, 98);
        assert_eq!(profile.games_played, 2);
        assert_eq!(profile.last_played, Timestamp::new(2));
        assert_eq!(leaderboard.results().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_results_are_not_lost() {
        // テスト項目: 同時に記録しても試合数と最高記録が失われない
        // given (前提条件):
        let leaderboard = Arc::new(InMemoryLeaderboard::new());

        // when (操作):
        let handles: Vec<_> = (1..=20)
            .map(|wpm| {
                let leaderboard = leaderboard.clone();
                tokio::spawn(async move {
                    leaderboard
                        .record_result(result("alice", wpm, 100, i64::from(wpm)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果):
        let profile = leaderboard
            .profile(&UserId::new("alice".to_string()).unwrap())
            .await
            .unwrap();
        assert_eq!(profile.games_played, 20);
        assert_eq!(profile.best_wpm, 20);
    }
}
