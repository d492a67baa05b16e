//! UI layer: terminal front end.

mod command;
mod input;
mod practice;
mod race;
mod render;

use std::sync::Arc;

use typerace_core::{
    domain::{Clock, Identity, SystemClock, UserId},
    infrastructure::WordListGenerator,
    session::{RoomSession, SessionConfig, SessionContext},
    usecase::{CreateRoomUseCase, JoinRoomUseCase},
};

use crate::{
    cli::{Cli, Command, practice_mode},
    error::ClientError,
    infrastructure::{ApiClient, RemoteLeaderboard, RemoteRoomStore},
};

fn identity(cli: &Cli) -> Result<Identity, ClientError> {
    let uid = match &cli.uid {
        Some(uid) => uid.clone(),
        None => format!("guest-{}", uuid::Uuid::new_v4().simple()),
    };
    Ok(Identity::new(UserId::new(uid)?, cli.name.clone()))
}

/// Run the client until the user leaves.
pub async fn run_client(cli: Cli) -> Result<(), ClientError> {
    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let me = identity(&cli)?;
    let api = ApiClient::new(&cli.server);
    let store = Arc::new(RemoteRoomStore::new(api.clone()));
    let leaderboard = Arc::new(RemoteLeaderboard::new(api));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    tracing::info!("Signed in as {}", me.uid);

    let room_id = match &cli.command {
        Command::Practice { text, seconds } => {
            let mode = practice_mode(*text, *seconds)?;
            let name = me.display_name.clone().unwrap_or_else(|| "Player".to_string());
            let lines = input::spawn_line_reader("> ");
            practice::run_practice(mode, me.uid, name, leaderboard, clock, lines).await;
            return Ok(());
        }
        Command::Create => {
            let room = CreateRoomUseCase::new(store.clone(), clock).execute(&me).await?;
            println!("Created room {}. Share the code with your opponent.", room.id);
            room.id
        }
        Command::Join { room_id } => {
            let (id, seat) = JoinRoomUseCase::new(store.clone()).execute(room_id, &me).await?;
            println!("Joined room {id} as {seat}.");
            id
        }
    };

    let ctx = SessionContext::new(
        store,
        leaderboard,
        Arc::new(WordListGenerator::new()),
        config,
    );
    let session = RoomSession::open(ctx, room_id, me.clone()).await?;
    let lines = input::spawn_line_reader("> ");
    race::run_race(session, me.uid, lines).await;
    Ok(())
}
