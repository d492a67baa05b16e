//! ラウンド単位のタイマー
//!
//! 周期タスクはすべて [`RoundKey`] で識別される 1 つのラウンドに属します。
//! 新しいキーで arm すると以前のタスクは中断され、[`RoundTimers`] を破棄すると
//! すべて中断されます。タイマーが arm したラウンドやセッションより長く
//! 生き残ることはありません。

use std::{future::Future, time::Duration};

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::domain::Timestamp;

/// タイマーを arm したラウンドのフェーズ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundKey {
    /// カウントダウン中のラウンドの課題文で識別
    Countdown(String),
    /// ラウンドの開始時刻で識別
    Playing(Timestamp),
}

#[derive(Default)]
pub struct RoundTimers {
    armed: Option<RoundKey>,
    tasks: Vec<JoinHandle<()>>,
}

impl RoundTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> Option<&RoundKey> {
        self.armed.as_ref()
    }

    pub fn is_armed(&self, key: &RoundKey) -> bool {
        self.armed.as_ref() == Some(key)
    }

    /// すべてのタスクを中断し、キーを忘れる
    pub fn disarm(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.armed = None;
    }

    /// 以前のタスクを中断し、`key` 用の新しいタスク群を開始する
    pub fn arm(&mut self, key: RoundKey) {
        self.disarm();
        self.armed = Some(key);
    }

    /// `delay` 後に `tick` を 1 回送る。[`arm`](Self::arm) の後に呼ぶこと
    pub fn once<T>(&mut self, delay: Duration, tx: UnboundedSender<T>, tick: T)
    where
        T: Send + 'static,
    {
        self.spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(tick);
        });
    }

    /// `period` ごとに `make` で作った tick を送る（初回は 1 周期後）
    pub fn every<T, F>(&mut self, period: Duration, tx: UnboundedSender<T>, make: F)
    where
        T: Send + 'static,
        F: Fn() -> T + Send + 'static,
    {
        self.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(make()).is_err() {
                    break;
                }
            }
        });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(tokio::spawn(task));
    }
}

impl Drop for RoundTimers {
    fn drop(&mut self) {
        self.disarm();
    }
}
