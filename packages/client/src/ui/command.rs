//! Parsing of lines typed at the race prompt.

use typerace_core::{
    domain::{GameDuration, ParagraphLength},
    session::SessionCommand,
    tracker::InputEdit,
    usecase::SettingsUpdate,
};

pub const HELP: &str = "\
Commands:
  /ready, /unready          toggle readiness (guest)
  /settings KEY=VALUE ...   words=50|100|200|300 time=30|60|120 punct=on|off numbers=on|off
  /start                    start the round (host)
  /back [N]                 delete the last N characters
  /rematch                  reset the finished room (host)
  /leave                    leave the room
Anything else is typed into the race.";

/// What one prompt line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum LineAction {
    Session(SessionCommand),
    /// Text to append to the local input
    Type(String),
    Help,
}

pub fn parse_line(line: &str) -> Result<LineAction, String> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(LineAction::Type(line.to_string()));
    };
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let action = match name {
        "ready" => LineAction::Session(SessionCommand::SetReady(true)),
        "unready" => LineAction::Session(SessionCommand::SetReady(false)),
        "start" => LineAction::Session(SessionCommand::Start),
        "rematch" => LineAction::Session(SessionCommand::Rematch),
        "leave" | "quit" => LineAction::Session(SessionCommand::Leave),
        "help" => LineAction::Help,
        "back" => {
            let count = match words.next() {
                Some(n) => n
                    .parse::<usize>()
                    .map_err(|_| format!("'{n}' is not a character count"))?,
                None => 1,
            };
            LineAction::Session(SessionCommand::Input(InputEdit::Backspace(count)))
        }
        "settings" => LineAction::Session(SessionCommand::UpdateSettings(parse_settings(words)?)),
        other => return Err(format!("Unknown command '/{other}' (try /help)")),
    };
    Ok(action)
}

fn parse_settings<'a>(pairs: impl Iterator<Item = &'a str>) -> Result<SettingsUpdate, String> {
    let mut update = SettingsUpdate::default();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{pair}'"))?;
        match key {
            "words" => {
                let words = parse_number(value)?;
                update.paragraph_length =
                    Some(ParagraphLength::try_from(words).map_err(|e| e.to_string())?);
            }
            "time" => {
                let seconds = parse_number(value)?;
                update.game_duration =
                    Some(GameDuration::try_from(seconds).map_err(|e| e.to_string())?);
            }
            "punct" => update.include_punctuation = Some(parse_switch(value)?),
            "numbers" => update.include_numbers = Some(parse_switch(value)?),
            other => return Err(format!("unknown setting '{other}'")),
        }
    }
    if update.is_empty() {
        return Err("nothing to change (see /help)".to_string());
    }
    Ok(update)
}

fn parse_number(value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on/off, got '{other}'")),
    }
}

/// Edit that appends `line` to `current`, separated by one space.
pub fn append_edit(current: &str, line: &str) -> InputEdit {
    if current.is_empty() || current.ends_with(' ') {
        InputEdit::Append(line.to_string())
    } else {
        InputEdit::Append(format!(" {line}"))
    }
}
