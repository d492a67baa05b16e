//! Interactive race loop.

use typerace_core::{
    domain::{Room, UserId},
    session::{RoomSession, SessionCommand, SessionEvent},
};

use super::{
    command::{HELP, LineAction, append_edit, parse_line},
    render,
};

fn typed_text(room: &Room, me: &UserId) -> String {
    room.seat_of(me)
        .and_then(|seat| room.player(seat))
        .map(|p| p.typed_text.clone())
        .unwrap_or_default()
}

/// Drive `session` from prompt lines until it closes.
pub async fn run_race(
    mut session: RoomSession,
    me: UserId,
    mut lines: tokio::sync::mpsc::UnboundedReceiver<String>,
) {
    println!("Room code: {} (type /help for commands)", session.room_id());
    let mut shown: Option<Room> = None;
    let mut local_text = String::new();
    let mut input_open = true;

    loop {
        tokio::select! {
            event = session.next_event() => {
                let Some(event) = event else {
                    break;
                };
                match event {
                    SessionEvent::Snapshot(room) => {
                        if let Some(out) = render::snapshot_update(shown.as_ref(), &room, &me) {
                            println!("{out}");
                        }
                        local_text = typed_text(&room, &me);
                        shown = Some(room);
                    }
                    SessionEvent::Stats(stats) => {
                        local_text = stats.typed_text.clone();
                        println!("{}", render::stats_line(&stats));
                    }
                    SessionEvent::Notice(message) => println!("! {message}"),
                    SessionEvent::ResultRecorded(profile) => {
                        println!("{}", render::profile_line(&profile));
                    }
                    SessionEvent::Closed(reason) => {
                        println!("{}", render::closed_line(reason));
                        break;
                    }
                }
            }
            line = lines.recv(), if input_open => {
                let Some(line) = line else {
                    // Ctrl+C / Ctrl+D at the prompt
                    input_open = false;
                    session.send(SessionCommand::Leave);
                    continue;
                };
                match parse_line(&line) {
                    Ok(LineAction::Session(command)) => {
                        session.send(command);
                    }
                    Ok(LineAction::Type(text)) => {
                        let edit = append_edit(&local_text, &text);
                        local_text = edit.apply(&local_text);
                        session.send(SessionCommand::Input(edit));
                    }
                    Ok(LineAction::Help) => println!("{HELP}"),
                    Err(message) => println!("! {message}"),
                }
            }
        }
    }
}
