//! Plain-text rendering of rooms and events.

use typerace_core::{
    domain::{Player, Room, RoomStatus, Seat, TypingStats, UserId, UserProfile, Winner},
    session::CloseReason,
};

fn seat_line(seat: Seat, player: Option<&Player>, me: &UserId) -> String {
    let Some(p) = player else {
        return format!("  {seat}: (empty)");
    };
    let mut tags = Vec::new();
    if p.is_host {
        tags.push("host");
    }
    if &p.uid == me {
        tags.push("you");
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", tags.join(", "))
    };
    let ready = if p.is_ready { "ready" } else { "not ready" };
    format!(
        "  {seat}: {}{tags} [{ready}] {} wpm, {}% acc, {}%",
        p.name, p.wpm, p.accuracy, p.progress
    )
}

fn winner_line(room: &Room) -> String {
    match room.winner {
        Some(Winner::Draw) => "Result: draw".to_string(),
        Some(winner) => {
            let name = winner
                .seat()
                .and_then(|seat| room.player(seat))
                .map(|p| p.name.as_str())
                .unwrap_or("an empty seat");
            format!("Result: {name} wins")
        }
        None => "Result: pending".to_string(),
    }
}

/// Full board for a room.
pub fn board(room: &Room, me: &UserId) -> String {
    let s = &room.settings;
    let mut lines = vec![
        format!("Room {} [{}]", room.id, room.status),
        format!(
            "  settings: {} words, {} s, punctuation {}, numbers {}",
            s.paragraph_length.words(),
            s.game_duration.seconds(),
            if s.include_punctuation { "on" } else { "off" },
            if s.include_numbers { "on" } else { "off" },
        ),
        seat_line(Seat::Player1, room.player1.as_ref(), me),
        seat_line(Seat::Player2, room.player2.as_ref(), me),
    ];
    match room.status {
        RoomStatus::Countdown => lines.push("Get ready...".to_string()),
        RoomStatus::Playing => {
            if let Some(text) = &room.paragraph_text {
                lines.push(String::new());
                lines.push(text.clone());
            }
        }
        RoomStatus::Finished => lines.push(winner_line(room)),
        RoomStatus::Waiting | RoomStatus::Ready => {}
    }
    lines.join("\n")
}

/// Output for a new snapshot given the previous one.
///
/// The board is redrawn when the room changes shape (status, seats,
/// readiness, settings). While playing, a change in the opponent's stats
/// only produces a one-line progress update.
pub fn snapshot_update(previous: Option<&Room>, room: &Room, me: &UserId) -> Option<String> {
    let Some(prev) = previous else {
        return Some(board(room, me));
    };
    if reshaped(prev, room) {
        return Some(board(room, me));
    }
    if room.status != RoomStatus::Playing {
        return None;
    }
    let mine = room.seat_of(me)?;
    let opponent = room.player(mine.other())?;
    let changed = prev
        .player(mine.other())
        .is_none_or(|before| before.stats() != opponent.stats());
    changed.then(|| {
        format!(
            "  {}: {}% ({} wpm)",
            opponent.name, opponent.progress, opponent.wpm
        )
    })
}

fn reshaped(prev: &Room, room: &Room) -> bool {
    let seat_shape = |p: Option<&Player>| p.map(|p| (p.uid.clone(), p.is_ready, p.is_host));
    prev.status != room.status
        || prev.settings != room.settings
        || prev.winner != room.winner
        || seat_shape(prev.player1.as_ref()) != seat_shape(room.player1.as_ref())
        || seat_shape(prev.player2.as_ref()) != seat_shape(room.player2.as_ref())
}

pub fn stats_line(stats: &TypingStats) -> String {
    format!(
        "  you: {}% | {} wpm | {}% acc | {} errors",
        stats.progress, stats.wpm, stats.accuracy, stats.errors
    )
}

pub fn profile_line(profile: &UserProfile) -> String {
    format!(
        "Saved. Best {} wpm / {}% over {} games.",
        profile.best_wpm, profile.best_accuracy, profile.games_played
    )
}

pub fn closed_line(reason: CloseReason) -> &'static str {
    match reason {
        CloseReason::Left => "You left the room.",
        CloseReason::RoomGone => "The room no longer exists.",
        CloseReason::AccessDenied => "You no longer hold a seat in this room.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typerace_core::domain::{Identity, RoomId, Timestamp};

    fn uid(name: &str) -> UserId {
        UserId::new(name.to_string()).unwrap()
    }

    fn duel() -> Room {
        let alice = Identity::new(uid("alice"), Some("Alice".to_string()));
        let bob = Identity::new(uid("bob"), Some("Bob".to_string()));
        let mut room = Room::new(RoomId::parse("ABC123").unwrap(), &alice, Timestamp::new(0));
        room.guest_id = Some(bob.uid.clone());
        room.player2 = Some(Player::guest(&bob));
        room.status = RoomStatus::Ready;
        room
    }

    #[test]
    fn test_board_marks_host_and_self() {
        // テスト項目: ボードにホストと自分の印が表示される
        // given (前提条件):
        let room = duel();

        // when (操作):
        let text = board(&room, &uid("bob"));

        // then (期待する結果):
        assert!(text.contains("Room ABC123 [ready]"));
        assert!(text.contains("Alice (host) [ready]"));
        assert!(text.contains("Bob (you) [not ready]"));
    }

    #[test]
    fn test_finished_board_names_winner() {
        // テスト項目: 終了したルームでは勝者名が表示される
        // given (前提条件):
        let mut room = duel();
        room.status = RoomStatus::Finished;
        room.winner = Some(Winner::Player2);

        // when (操作):
        let text = board(&room, &uid("alice"));

        // then (期待する結果):
        assert!(text.ends_with("Result: Bob wins"));
    }

    #[test]
    fn test_opponent_progress_is_a_single_line() {
        // テスト項目: プレイ中は相手の進捗変化だけが 1 行で表示される
        // given (前提条件):
        let mut before = duel();
        before.status = RoomStatus::Playing;
        before.paragraph_text = Some("hello".to_string());
        before.start_time = Some(Timestamp::new(0));
        let mut after = before.clone();
        if let Some(bob) = after.player2.as_mut() {
            bob.progress = 40;
            bob.wpm = 24;
        }

        // when (操作):
        let update = snapshot_update(Some(&before), &after, &uid("alice"));
        let unchanged = snapshot_update(Some(&after), &after, &uid("alice"));

        // then (期待する結果):
        assert_eq!(update.as_deref(), Some("  Bob: 40% (24 wpm)"));
        assert_eq!(unchanged, None);
    }

    #[test]
    fn test_status_change_redraws_board() {
        // テスト項目: ステータスが変わるとボード全体を再描画する
        // given (前提条件):
        let before = duel();
        let mut after = before.clone();
        after.status = RoomStatus::Countdown;
        after.paragraph_text = Some("hello".to_string());

        // when (操作):
        let update = snapshot_update(Some(&before), &after, &uid("alice")).unwrap();

        // then (期待する結果):
        assert!(update.contains("[countdown]"));
        assert!(update.contains("Get ready..."));
    }
}
