//! タイピングトラッカー
//!
//! 入力テキストからプレイヤーのライブ統計を求めます。統計は変更のたびに
//! テキスト全体から計算し直すため、バックスペース後にエラー数がずれることは
//! ありません。

use crate::{domain::TypingStats, metrics};

/// ローカル入力への変更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    /// 入力全体の置き換え
    Replace(String),
    Append(String),
    /// 末尾から指定文字数を削除
    Backspace(usize),
}

impl InputEdit {
    /// `text` に変更を適用した新しい入力を返す
    pub fn apply(&self, text: &str) -> String {
        match self {
            InputEdit::Replace(new_text) => new_text.clone(),
            InputEdit::Append(suffix) => format!("{text}{suffix}"),
            InputEdit::Backspace(count) => {
                let keep = text.chars().count().saturating_sub(*count);
                text.chars().take(keep).collect()
            }
        }
    }
}

/// `typed` と `paragraph` で文字が異なる位置の数
///
/// 課題文の末尾を超えて入力した文字はすべてエラーとして数えます。
pub fn count_errors(typed: &str, paragraph: &str) -> usize {
    let mut reference = paragraph.chars();
    typed.chars().filter(|c| reference.next() != Some(*c)).count()
}

/// 入力が課題文以上の長さになったら完走
pub fn is_finished(typed: &str, paragraph: &str) -> bool {
    typed.chars().count() >= paragraph.chars().count()
}

/// `typed` の `paragraph` に対する統計一式を計算する
pub fn evaluate(typed: &str, paragraph: &str, elapsed_seconds: f64) -> TypingStats {
    let typed_chars = typed.chars().count();
    let errors = count_errors(typed, paragraph);
    let correct_chars = typed_chars - errors;
    TypingStats {
        typed_text: typed.to_string(),
        errors: u32::try_from(errors).unwrap_or(u32::MAX),
        progress: metrics::progress(typed_chars, paragraph.chars().count()),
        accuracy: metrics::accuracy(typed_chars, errors),
        wpm: metrics::wpm(correct_chars, elapsed_seconds),
    }
}

/// 1 人のプレイヤーの入力をローカルに保持するトラッカー
///
/// 共有ドキュメントへ書き込む前に更新されるため、書き込みに失敗しても
/// 入力は失われません。
#[derive(Debug, Clone)]
pub struct TypingTracker {
    paragraph: String,
    stats: TypingStats,
}

impl TypingTracker {
    pub fn new(paragraph: impl Into<String>) -> Self {
        Self {
            paragraph: paragraph.into(),
            stats: TypingStats::default(),
        }
    }

    pub fn paragraph(&self) -> &str {
        &self.paragraph
    }

    pub fn stats(&self) -> &TypingStats {
        &self.stats
    }

    pub fn typed_text(&self) -> &str {
        &self.stats.typed_text
    }

    pub fn is_finished(&self) -> bool {
        is_finished(&self.stats.typed_text, &self.paragraph)
    }

    /// 変更を適用して全統計を再計算し、新しい統計を返す
    pub fn input(&mut self, edit: &InputEdit, elapsed_seconds: f64) -> &TypingStats {
        let text = edit.apply(&self.stats.typed_text);
        self.stats = evaluate(&text, &self.paragraph, elapsed_seconds);
        &self.stats
    }

    /// 現在のテキストのまま、新しい経過時間で再計算する
    ///
    /// いずれかの統計が変わった場合 `true` (時間の経過で WPM は変わる)
    pub fn refresh(&mut self, elapsed_seconds: f64) -> bool {
        let refreshed = evaluate(&self.stats.typed_text, &self.paragraph, elapsed_seconds);
        let changed = refreshed != self.stats;
        self.stats = refreshed;
        changed
    }
}
