//! 1 人用タイピングテスト（練習モード）
//!
//! 計測は最初の入力から始まります。テキストモードは課題文の長さまで入力した
//! 時点で、時間モードは時間切れでも終了します。統計は対戦と同じトラッカーで
//! 計算します。

use std::time::Duration;

use crate::{
    domain::{Timestamp, TypingStats},
    tracker::{InputEdit, TypingTracker},
};

const SHORT_TEXT: &str = "The quick brown fox jumps over the lazy dog.";
const MEDIUM_TEXT: &str = "In the middle of difficulty lies opportunity. The only way to do great work is to love what you do. Life is what happens when you're busy making other plans.";
const LONG_TEXT: &str = "To be, or not to be, that is the question: Whether 'tis nobler in the mind to suffer the slings and arrows of outrageous fortune, Or to take Arms against a Sea of troubles, And by opposing end them: to die, to sleep.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PracticeText {
    Short,
    #[default]
    Medium,
    Long,
}

impl PracticeText {
    pub fn text(self) -> &'static str {
        match self {
            PracticeText::Short => SHORT_TEXT,
            PracticeText::Medium => MEDIUM_TEXT,
            PracticeText::Long => LONG_TEXT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeMode {
    /// 1 つの文章を最後まで入力する
    Text(PracticeText),
    /// 長い文章を決まった秒数（60, 120, 300）だけ入力する
    Timed(u32),
}

impl PracticeMode {
    pub const TIMED_OPTIONS: [u32; 3] = [60, 120, 300];

    /// `seconds` が [`TIMED_OPTIONS`](Self::TIMED_OPTIONS) のいずれかなら時間モード
    pub fn timed(seconds: u32) -> Option<Self> {
        Self::TIMED_OPTIONS
            .contains(&seconds)
            .then_some(PracticeMode::Timed(seconds))
    }

    fn paragraph(self) -> &'static str {
        match self {
            PracticeMode::Text(text) => text.text(),
            PracticeMode::Timed(_) => LONG_TEXT,
        }
    }

    fn limit(self) -> Option<Duration> {
        match self {
            PracticeMode::Text(_) => None,
            PracticeMode::Timed(seconds) => Some(Duration::from_secs(u64::from(seconds))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    Waiting,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeResult {
    pub stats: TypingStats,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct PracticeTest {
    mode: PracticeMode,
    tracker: TypingTracker,
    started_at: Option<Timestamp>,
    result: Option<PracticeResult>,
}

impl PracticeTest {
    pub fn new(mode: PracticeMode) -> Self {
        Self {
            mode,
            tracker: TypingTracker::new(mode.paragraph()),
            started_at: None,
            result: None,
        }
    }

    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn paragraph(&self) -> &str {
        self.tracker.paragraph()
    }

    pub fn stats(&self) -> &TypingStats {
        self.tracker.stats()
    }

    pub fn result(&self) -> Option<&PracticeResult> {
        self.result.as_ref()
    }

    pub fn state(&self) -> PracticeState {
        match (self.started_at, &self.result) {
            (_, Some(_)) => PracticeState::Finished,
            (Some(_), None) => PracticeState::InProgress,
            (None, None) => PracticeState::Waiting,
        }
    }

    /// 時間モードの残り時間（テキストモードでは `None`）
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        let limit = self.mode.limit()?;
        let elapsed = self
            .started_at
            .map(|start| Duration::from_millis(now.millis_since(start).max(0) as u64))
            .unwrap_or_default();
        Some(limit.saturating_sub(elapsed))
    }

    /// 入力を適用する（終了後は無視）
    pub fn input(&mut self, edit: &InputEdit, now: Timestamp) -> Option<&TypingStats> {
        if self.tick(now) || self.result.is_some() {
            return None;
        }
        let start = *self.started_at.get_or_insert(now);
        self.tracker.input(edit, now.seconds_since(start));
        if self.tracker.is_finished() {
            self.finish(now);
        }
        Some(self.tracker.stats())
    }

    /// 制限時間を確認し、この呼び出しで終了した場合 `true`
    pub fn tick(&mut self, now: Timestamp) -> bool {
        let (Some(_), None) = (self.started_at, &self.result) else {
            return false;
        };
        if self.remaining(now) == Some(Duration::ZERO) {
            self.finish(now);
            return true;
        }
        false
    }

    fn finish(&mut self, now: Timestamp) {
        let Some(start) = self.started_at else {
            return;
        };
        let elapsed = now.seconds_since(start);
        let elapsed = match self.mode.limit() {
            Some(limit) => elapsed.min(limit.as_secs_f64()),
            None => elapsed,
        };
        self.tracker.refresh(elapsed);
        self.result = Some(PracticeResult {
            stats: self.tracker.stats().clone(),
            elapsed_seconds: elapsed,
        });
    }

    /// 同じモードでやり直す
    pub fn reset(&mut self) {
        *self = Self::new(self.mode);
    }
}
