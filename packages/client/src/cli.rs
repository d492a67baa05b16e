//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use typerace_core::practice::{PracticeMode, PracticeText};

use crate::error::ClientError;

#[derive(Debug, Parser)]
#[command(name = "typerace-client", version, about = "Two-player typing races in the terminal")]
pub struct Cli {
    /// Room host URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// User id (a random one is generated when omitted)
    #[arg(long)]
    pub uid: Option<String>,

    /// Display name (defaults to "Player 1" / "Player 2" by seat)
    #[arg(long)]
    pub name: Option<String>,

    /// Session timing overrides (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a room and wait for an opponent
    Create,
    /// Join a room by its six-character code
    Join { room_id: String },
    /// Single-player typing test
    Practice {
        /// Text to type
        #[arg(long, value_enum, default_value_t = TextChoice::Medium)]
        text: TextChoice,

        /// Timed mode: 60, 120 or 300 seconds
        #[arg(long, conflicts_with = "text")]
        seconds: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextChoice {
    Short,
    Medium,
    Long,
}

impl From<TextChoice> for PracticeText {
    fn from(choice: TextChoice) -> Self {
        match choice {
            TextChoice::Short => PracticeText::Short,
            TextChoice::Medium => PracticeText::Medium,
            TextChoice::Long => PracticeText::Long,
        }
    }
}

/// Practice mode selected by the `practice` arguments.
pub fn practice_mode(text: TextChoice, seconds: Option<u32>) -> Result<PracticeMode, ClientError> {
    match seconds {
        Some(s) => PracticeMode::timed(s).ok_or(ClientError::PracticeDuration(s)),
        None => Ok(PracticeMode::Text(text.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join_subcommand() {
        // テスト項目: join サブコマンドとグローバルオプションを解析できる
        // when (操作):
        let cli = Cli::try_parse_from([
            "typerace-client",
            "--uid",
            "alice",
            "--name",
            "Alice",
            "join",
            "abc123",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(cli.uid.as_deref(), Some("alice"));
        assert_eq!(cli.server, "http://127.0.0.1:8080");
        assert!(matches!(cli.command, Command::Join { room_id } if room_id == "abc123"));
    }

    #[test]
    fn test_practice_mode_selection() {
        // テスト項目: 練習モードの選択（テキスト / 時間制限）
        // when (操作) / then (期待する結果):
        assert_eq!(
            practice_mode(TextChoice::Short, None).unwrap(),
            PracticeMode::Text(PracticeText::Short)
        );
        assert_eq!(
            practice_mode(TextChoice::Medium, Some(120)).unwrap(),
            PracticeMode::Timed(120)
        );
        assert!(matches!(
            practice_mode(TextChoice::Medium, Some(90)),
            Err(ClientError::PracticeDuration(90))
        ));
    }
}
