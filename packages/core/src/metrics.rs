//! タイピング指標の計算
//!
//! すべて純粋関数です。各クライアントが独立に再計算しても、同じ入力からは
//! 同じ値が得られます。

/// 経過秒数がこれ未満の間、WPM は 0 として扱う
pub const MIN_ELAPSED_SECONDS: f64 = 0.25;

/// 1 単語あたりの文字数
pub const CHARS_PER_WORD: f64 = 5.0;

/// WPM: `round((correct_chars / 5) / (elapsed_seconds / 60))`
///
/// 正しく入力した文字がない場合、または経過時間が [`MIN_ELAPSED_SECONDS`]
/// 未満の場合（時計のずれによる負の経過時間を含む）は 0。
pub fn wpm(correct_chars: usize, elapsed_seconds: f64) -> u32 {
    if correct_chars == 0 || !(elapsed_seconds >= MIN_ELAPSED_SECONDS) {
        return 0;
    }
    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_seconds / 60.0;
    // float-to-int `as` saturates, infinities cannot occur past the floor check
    (words / minutes).round() as u32
}

/// 正確率 (%): `round(100 * (typed_chars - errors) / typed_chars)`
///
/// 未入力は 100 (参加直後のプレイヤーと同じ値)。`errors` が `typed_chars` を
/// 超える場合は切り詰め、結果は常に `[0, 100]` に収まります。
pub fn accuracy(typed_chars: usize, errors: usize) -> u32 {
    if typed_chars == 0 {
        return 100;
    }
    let correct = typed_chars.saturating_sub(errors);
    (100.0 * correct as f64 / typed_chars as f64).round() as u32
}

/// 進捗率 (%): `round(min(typed, len) / len * 100)`
///
/// 空の課題文は 100 とみなす
pub fn progress(typed_chars: usize, paragraph_chars: usize) -> u32 {
    if paragraph_chars == 0 {
        return 100;
    }
    let covered = typed_chars.min(paragraph_chars);
    (100.0 * covered as f64 / paragraph_chars as f64).round() as u32
}

/// 順位付けのスコア
///
/// 正確率で重み付けした速度に、同点決着用として `progress_weight` 倍の
/// 進捗率を加えたもの。
pub fn score(wpm: u32, accuracy: u32, progress: u32, progress_weight: f64) -> f64 {
    f64::from(wpm) * (f64::from(accuracy) / 100.0) + f64::from(progress) * progress_weight
}
