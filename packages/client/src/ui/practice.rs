//! Single-player practice loop.

use std::{sync::Arc, time::Duration};

use typerace_core::{
    domain::{Clock, GameMode, LeaderboardStore, UserId},
    practice::{PracticeMode, PracticeState, PracticeTest},
    tracker::InputEdit,
    usecase::SaveResultUseCase,
};

use super::{command::append_edit, render};

/// Practice commands are a subset of the race commands.
#[derive(Debug, PartialEq)]
enum PracticeLine {
    Type(String),
    Back(usize),
    Restart,
    Quit,
}

fn parse(line: &str) -> Result<PracticeLine, String> {
    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["/restart"] => Ok(PracticeLine::Restart),
        ["/quit"] | ["/leave"] => Ok(PracticeLine::Quit),
        ["/back"] => Ok(PracticeLine::Back(1)),
        ["/back", n] => n
            .parse()
            .map(PracticeLine::Back)
            .map_err(|_| format!("'{n}' is not a character count")),
        _ if line.starts_with('/') => Err("practice commands: /back [N], /restart, /quit".to_string()),
        _ => Ok(PracticeLine::Type(line.to_string())),
    }
}

fn announce(test: &PracticeTest) {
    match test.mode() {
        PracticeMode::Text(_) => println!("Type the text below. The clock starts with your first line."),
        PracticeMode::Timed(seconds) => {
            println!("Type as much as you can in {seconds} s. The clock starts with your first line.")
        }
    }
    println!("\n{}\n", test.paragraph());
}

async fn finish(
    test: &PracticeTest,
    save: &SaveResultUseCase,
    uid: &UserId,
    name: &str,
) {
    let Some(result) = test.result() else {
        return;
    };
    println!(
        "Done in {:.1} s: {} wpm, {}% accuracy, {} errors.",
        result.elapsed_seconds, result.stats.wpm, result.stats.accuracy, result.stats.errors
    );
    match save.execute(uid, name, &result.stats, GameMode::Test).await {
        Ok(Some(profile)) => println!("{}", render::profile_line(&profile)),
        Ok(None) => {}
        Err(e) => println!("! Could not save the result: {e}"),
    }
    println!("/restart to go again, /quit to leave.");
}

/// Run practice tests until the user quits.
pub async fn run_practice(
    mode: PracticeMode,
    uid: UserId,
    name: String,
    leaderboard: Arc<dyn LeaderboardStore>,
    clock: Arc<dyn Clock>,
    mut lines: tokio::sync::mpsc::UnboundedReceiver<String>,
) {
    let save = SaveResultUseCase::new(leaderboard, clock.clone());
    let mut test = PracticeTest::new(mode);
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    announce(&test);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if test.tick(clock.now()) {
                    println!("Time is up.");
                    finish(&test, &save, &uid, &name).await;
                }
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };
                let edit = match parse(&line) {
                    Ok(PracticeLine::Quit) => break,
                    Ok(PracticeLine::Restart) => {
                        test.reset();
                        announce(&test);
                        continue;
                    }
                    Ok(PracticeLine::Back(count)) => InputEdit::Backspace(count),
                    Ok(PracticeLine::Type(text)) => append_edit(&test.stats().typed_text, &text),
                    Err(message) => {
                        println!("! {message}");
                        continue;
                    }
                };
                if test.state() == PracticeState::Finished {
                    println!("! The test is over. /restart to go again.");
                    continue;
                }
                let now = clock.now();
                if let Some(stats) = test.input(&edit, now) {
                    println!("{}", render::stats_line(stats));
                }
                if test.state() == PracticeState::Finished {
                    finish(&test, &save, &uid, &name).await;
                }
            }
        }
    }
}
