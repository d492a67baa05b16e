//! 終了判定（アービター）
//!
//! 接続中の各クライアントが、手元のルームのスナップショットに対して同じ
//! 決定的な判定を実行します。同じスナップショットからは必ず同じ判定が
//! 得られます。サーバー側で判定する場合も、[`Arbiter`] を実装すれば
//! トラッカーやセッションに手を入れずに [`ScoreArbiter`] と差し替えられます。

use crate::{
    domain::{Room, RoomStatus, Seat, Timestamp, Winner},
    metrics, tracker,
};

/// スコアにおける進捗率の既定の重み
pub const DEFAULT_PROGRESS_WEIGHT: f64 = 0.01;

/// ラウンドの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    BothFinished,
    /// 着席中の唯一のプレイヤーが完走した
    OpponentAbsent,
}

/// 1 回の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    End { winner: Winner, reason: EndReason },
}

/// `playing` のラウンドが終わったか、勝者は誰かを判定する
pub trait Arbiter: Send + Sync {
    /// 時刻 `now` における `room` を判定する（入力のみに依存する純粋関数）
    fn decide(&self, room: &Room, now: Timestamp) -> Verdict;
}

/// 時間切れ、または着席中の全員が完走したらラウンドを終える既定の判定
///
/// 順位は `wpm * accuracy / 100 + progress * progress_weight` で決まります。
#[derive(Debug, Clone, Copy)]
pub struct ScoreArbiter {
    progress_weight: f64,
}

impl Default for ScoreArbiter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_WEIGHT)
    }
}

impl ScoreArbiter {
    pub fn new(progress_weight: f64) -> Self {
        Self { progress_weight }
    }

    fn finished(room: &Room, seat: Seat) -> bool {
        match (room.player(seat), room.paragraph_text.as_deref()) {
            (Some(player), Some(paragraph)) => tracker::is_finished(&player.typed_text, paragraph),
            _ => false,
        }
    }

    fn score(&self, room: &Room, seat: Seat) -> Option<f64> {
        room.player(seat)
            .map(|p| metrics::score(p.wpm, p.accuracy, p.progress, self.progress_weight))
    }

    /// 見えているスナップショットからの勝者（誰も着席していなければ `None`）
    fn winner(&self, room: &Room) -> Option<Winner> {
        match (
            self.score(room, Seat::Player1),
            self.score(room, Seat::Player2),
        ) {
            (Some(p1), Some(p2)) if p1 > p2 => Some(Winner::Player1),
            (Some(p1), Some(p2)) if p2 > p1 => Some(Winner::Player2),
            (Some(_), Some(_)) => Some(Winner::Draw),
            (Some(_), None) => Some(Winner::Player1),
            (None, Some(_)) => Some(Winner::Player2),
            (None, None) => None,
        }
    }
}

impl Arbiter for ScoreArbiter {
    fn decide(&self, room: &Room, now: Timestamp) -> Verdict {
        if room.status != RoomStatus::Playing {
            return Verdict::Continue;
        }
        let Some(start_time) = room.start_time else {
            return Verdict::Continue;
        };

        let by_time = now.millis_since(start_time) >= room.settings.game_duration.millis();
        let p1_finished = Self::finished(room, Seat::Player1);
        let p2_finished = Self::finished(room, Seat::Player2);
        let p1_absent = room.player1.is_none();
        let p2_absent = room.player2.is_none();

        let reason = if by_time {
            EndReason::TimeUp
        } else if p1_finished && p2_finished {
            EndReason::BothFinished
        } else if (p1_finished && p2_absent) || (p2_finished && p1_absent) {
            EndReason::OpponentAbsent
        } else {
            return Verdict::Continue;
        };

        match self.winner(room) {
            Some(winner) => Verdict::End { winner, reason },
            // nobody left to win; the room is abandoned and will be reclaimed
            None => Verdict::Continue,
        }
    }
}
