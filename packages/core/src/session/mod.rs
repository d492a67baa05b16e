//! クライアントごとのルームセッション
//!
//! [`RoomSession`] は 1 つのルームに対する 1 クライアントのイベントループです。
//! 購読でルームドキュメントを監視し、ローカルのトラッカーを保持し、ラウンド
//! 単位のタイマー（カウントダウン、終了判定、WPM 再計算）を arm して、
//! ユーザーのコマンドをユースケースの呼び出しに変換します。
//!
//! ユーザー操作の失敗は [`SessionEvent::Notice`] として通知し、自動の書き込みの
//! 失敗はログに残すだけです。クライアント間で共有するのはストアだけです。

pub mod config;
pub mod timers;

pub use config::{ConfigError, SessionConfig};
pub use timers::{RoundKey, RoundTimers};

use std::{future::Future, sync::Arc};

use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        watch,
    },
    task::{JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    arbiter::{Arbiter, ScoreArbiter},
    domain::{
        Clock, GameMode, Identity, LeaderboardStore, ParagraphGenerator, Room, RoomId,
        RoomStatus, RoomStore, RoomSubscription, SystemClock, Timestamp, TypingStats,
        UserProfile,
    },
    tracker::{InputEdit, TypingTracker},
    usecase::{
        BeginPlayUseCase, CheckTerminationUseCase, LeaveRoomUseCase, RecordTypingUseCase,
        RematchUseCase, SaveResultUseCase, SessionError, SetReadyUseCase, SettingsUpdate,
        StartRoundUseCase, UpdateSettingsUseCase,
    },
};

/// クライアントの全セッションで共有する依存先
#[derive(Clone)]
pub struct SessionContext {
    pub store: Arc<dyn RoomStore>,
    pub leaderboard: Arc<dyn LeaderboardStore>,
    pub generator: Arc<dyn ParagraphGenerator>,
    pub clock: Arc<dyn Clock>,
    pub arbiter: Arc<dyn Arbiter>,
    pub config: SessionConfig,
}

impl SessionContext {
    /// システム時計と `config` の重みの [`ScoreArbiter`] を使うコンテキスト
    pub fn new(
        store: Arc<dyn RoomStore>,
        leaderboard: Arc<dyn LeaderboardStore>,
        generator: Arc<dyn ParagraphGenerator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            leaderboard,
            generator,
            clock: Arc::new(SystemClock),
            arbiter: Arc::new(ScoreArbiter::new(config.progress_weight)),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_arbiter(mut self, arbiter: Arc<dyn Arbiter>) -> Self {
        self.arbiter = arbiter;
        self
    }
}

/// ローカルユーザーの操作
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Input(InputEdit),
    SetReady(bool),
    UpdateSettings(SettingsUpdate),
    Start,
    Rematch,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// ローカルユーザーが退出した
    Left,
    /// ルームが削除または回収された
    RoomGone,
    /// ローカルユーザーがルームの参加者でなくなった
    AccessDenied,
}

/// セッションの出力（発生順）
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Snapshot(Room),
    /// 入力の受理または WPM 再計算後のローカル統計
    Stats(TypingStats),
    /// ユーザー操作が失敗した（再試行できる）
    Notice(String),
    ResultRecorded(UserProfile),
    Closed(CloseReason),
}

enum Internal {
    CountdownElapsed(RoundKey),
    ArbiterTick(RoundKey),
    RefreshTick(RoundKey),
    Notice(String),
    Recorded(UserProfile),
}

/// 実行中のセッションへのハンドル
///
/// ハンドルを破棄するとセッションと arm 済みのタイマーは停止しますが、
/// ルームからは退出しません。
pub struct RoomSession {
    room_id: RoomId,
    commands: UnboundedSender<SessionCommand>,
    events: UnboundedReceiver<SessionEvent>,
    room: watch::Receiver<Room>,
    task: JoinHandle<()>,
}

impl RoomSession {
    /// `room_id` を購読してイベントループを開始する
    ///
    /// # Errors
    ///
    /// ルームが存在しなければ `RoomNotFound`、`waiting` 以外のルームで
    /// `identity` がどちらの座席にもいなければ `NotParticipant`
    pub async fn open(
        ctx: SessionContext,
        room_id: RoomId,
        identity: Identity,
    ) -> Result<Self, SessionError> {
        let mut subscription = ctx.store.subscribe(&room_id).await?;
        let initial = subscription
            .recv()
            .await
            .ok_or_else(|| SessionError::RoomNotFound(room_id.clone()))?;
        if denies_access(&initial, &identity) {
            return Err(SessionError::NotParticipant);
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (room_tx, room_rx) = watch::channel(initial.clone());

        let actor = SessionActor::new(
            ctx,
            room_id.clone(),
            identity,
            initial.clone(),
            event_tx,
            room_tx,
            internal_tx,
        );
        let task = tokio::spawn(actor.run(initial, subscription, command_rx, internal_rx));

        Ok(Self {
            room_id,
            commands: command_tx,
            events: event_rx,
            room: room_rx,
            task,
        })
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// セッションが最後に受け取ったスナップショット
    pub fn room(&self) -> Room {
        self.room.borrow().clone()
    }

    pub fn watch_room(&self) -> watch::Receiver<Room> {
        self.room.clone()
    }

    /// コマンドを送る。セッション終了後は `false`
    pub fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// 入力タスクに渡せる送信側
    pub fn commands(&self) -> UnboundedSender<SessionCommand> {
        self.commands.clone()
    }

    /// 次のイベント。[`SessionEvent::Closed`] を受け取った後は `None`
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn denies_access(room: &Room, identity: &Identity) -> bool {
    room.status != RoomStatus::Waiting && room.seat_of(&identity.uid).is_none()
}

struct UseCases {
    leave: LeaveRoomUseCase,
    set_ready: SetReadyUseCase,
    update_settings: UpdateSettingsUseCase,
    start_round: StartRoundUseCase,
    begin_play: BeginPlayUseCase,
    record_typing: RecordTypingUseCase,
    check_termination: CheckTerminationUseCase,
    rematch: RematchUseCase,
    save_result: SaveResultUseCase,
}

impl UseCases {
    fn new(ctx: &SessionContext) -> Self {
        let store = ctx.store.clone();
        Self {
            leave: LeaveRoomUseCase::new(store.clone()),
            set_ready: SetReadyUseCase::new(store.clone()),
            update_settings: UpdateSettingsUseCase::new(store.clone()),
            start_round: StartRoundUseCase::new(
                store.clone(),
                ctx.generator.clone(),
                ctx.config.generator_timeout(),
            ),
            begin_play: BeginPlayUseCase::new(store.clone()),
            record_typing: RecordTypingUseCase::new(store.clone(), ctx.clock.clone()),
            check_termination: CheckTerminationUseCase::new(
                store.clone(),
                ctx.arbiter.clone(),
                ctx.clock.clone(),
            ),
            rematch: RematchUseCase::new(store),
            save_result: SaveResultUseCase::new(ctx.leaderboard.clone(), ctx.clock.clone()),
        }
    }
}

struct SessionActor {
    room_id: RoomId,
    identity: Identity,
    room: Room,
    tracker: Option<TypingTracker>,
    timers: RoundTimers,
    /// 結果を記録した最後のラウンドの `startTime`
    recorded_round: Option<Timestamp>,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    usecases: UseCases,
    events: UnboundedSender<SessionEvent>,
    snapshot: watch::Sender<Room>,
    internal: UnboundedSender<Internal>,
}

impl SessionActor {
    fn new(
        ctx: SessionContext,
        room_id: RoomId,
        identity: Identity,
        room: Room,
        events: UnboundedSender<SessionEvent>,
        snapshot: watch::Sender<Room>,
        internal: UnboundedSender<Internal>,
    ) -> Self {
        Self {
            room_id,
            identity,
            room,
            tracker: None,
            timers: RoundTimers::new(),
            recorded_round: None,
            usecases: UseCases::new(&ctx),
            config: ctx.config,
            clock: ctx.clock,
            events,
            snapshot,
            internal,
        }
    }

    async fn run(
        mut self,
        initial: Room,
        mut subscription: RoomSubscription,
        mut commands: UnboundedReceiver<SessionCommand>,
        mut internal: UnboundedReceiver<Internal>,
    ) {
        let mut actions = JoinSet::new();
        info!("{} opened room {}", self.identity.uid, self.room_id);
        self.observe(initial, &mut actions);

        let reason = loop {
            tokio::select! {
                snapshot = subscription.recv() => match snapshot {
                    Some(room) => {
                        if denies_access(&room, &self.identity) {
                            break Some(CloseReason::AccessDenied);
                        }
                        self.observe(room, &mut actions);
                    }
                    None => break Some(CloseReason::RoomGone),
                },
                command = commands.recv() => match command {
                    Some(SessionCommand::Leave) => {
                        if self.leave().await {
                            break Some(CloseReason::Left);
                        }
                    }
                    Some(command) => self.handle(command, &mut actions).await,
                    None => break None,
                },
                Some(message) = internal.recv() => self.on_internal(message).await,
                Some(_) = actions.join_next(), if !actions.is_empty() => {}
            }
        };

        self.timers.disarm();
        actions.abort_all();
        match reason {
            Some(reason) => {
                info!("Session for room {} closed: {:?}", self.room_id, reason);
                self.emit(SessionEvent::Closed(reason));
            }
            None => debug!("Session handle for room {} dropped", self.room_id),
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    /// 新しいスナップショットを採用し、ラウンドのタイマーを張り直す
    fn observe(&mut self, room: Room, actions: &mut JoinSet<()>) {
        self.room = room.clone();
        self.snapshot.send_replace(room.clone());
        self.emit(SessionEvent::Snapshot(room));
        self.sync_round();
        if self.room.status == RoomStatus::Finished {
            self.record_result(actions);
        }
    }

    fn sync_round(&mut self) {
        let desired = match self.room.status {
            RoomStatus::Countdown => self.room.paragraph_text.clone().map(RoundKey::Countdown),
            RoomStatus::Playing => self.room.start_time.map(RoundKey::Playing),
            _ => None,
        };
        if matches!(
            self.room.status,
            RoomStatus::Waiting | RoomStatus::Ready | RoomStatus::Countdown
        ) {
            self.tracker = None;
        }

        let Some(key) = desired else {
            if self.timers.armed().is_some() {
                debug!("Disarming timers of room {}", self.room_id);
                self.timers.disarm();
            }
            return;
        };
        if self.timers.is_armed(&key) {
            return;
        }

        self.timers.arm(key.clone());
        match &key {
            RoundKey::Countdown(_) => {
                self.timers.once(
                    self.config.countdown(),
                    self.internal.clone(),
                    Internal::CountdownElapsed(key),
                );
            }
            RoundKey::Playing(start_time) => {
                self.tracker = self.resume_tracker(*start_time);
                let arbiter_key = key.clone();
                self.timers.every(
                    self.config.arbiter_interval(),
                    self.internal.clone(),
                    move || Internal::ArbiterTick(arbiter_key.clone()),
                );
                let refresh_key = key.clone();
                self.timers.every(
                    self.config.wpm_refresh(),
                    self.internal.clone(),
                    move || Internal::RefreshTick(refresh_key.clone()),
                );
            }
        }
    }

    /// 進行中のラウンドのトラッカー
    ///
    /// ラウンド途中で再接続した場合は、自分の座席に書き込み済みのテキストを
    /// 引き継ぎます。
    fn resume_tracker(&self, start_time: Timestamp) -> Option<TypingTracker> {
        let paragraph = self.room.paragraph_text.as_deref()?;
        let mut tracker = TypingTracker::new(paragraph);
        let seat = self.room.seat_of(&self.identity.uid)?;
        if let Some(player) = self.room.player(seat)
            && !player.typed_text.is_empty()
        {
            let elapsed = self.clock.now().seconds_since(start_time);
            tracker.input(&InputEdit::Replace(player.typed_text.clone()), elapsed);
        }
        Some(tracker)
    }

    /// ローカルプレイヤーの結果をラウンドごとに 1 回記録する
    fn record_result(&mut self, actions: &mut JoinSet<()>) {
        let Some(start_time) = self.room.start_time else {
            return;
        };
        if self.recorded_round == Some(start_time) {
            return;
        }
        self.recorded_round = Some(start_time);

        let Some(player) = self
            .room
            .seat_of(&self.identity.uid)
            .and_then(|seat| self.room.player(seat))
        else {
            return;
        };
        let stats = match &self.tracker {
            Some(tracker) => tracker.stats().clone(),
            None => player.stats(),
        };
        let name = player.name.clone();
        let uid = self.identity.uid.clone();
        let save_result = self.usecases.save_result.clone();
        let internal = self.internal.clone();
        actions.spawn(async move {
            match save_result.execute(&uid, &name, &stats, GameMode::Duel).await {
                Ok(Some(profile)) => {
                    let _ = internal.send(Internal::Recorded(profile));
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to record result for {}: {}", uid, e),
            }
        });
    }

    /// ユーザー操作をバックグラウンドで実行し、失敗は通知に変える
    fn spawn_action<F>(&self, actions: &mut JoinSet<()>, action: F)
    where
        F: Future<Output = Result<(), SessionError>> + Send + 'static,
    {
        let internal = self.internal.clone();
        actions.spawn(async move {
            if let Err(e) = action.await {
                let _ = internal.send(Internal::Notice(e.to_string()));
            }
        });
    }

    async fn handle(&mut self, command: SessionCommand, actions: &mut JoinSet<()>) {
        let id = self.room_id.clone();
        let uid = self.identity.uid.clone();
        match command {
            SessionCommand::Input(edit) => {
                let Some(tracker) = self.tracker.as_mut() else {
                    self.emit(SessionEvent::Notice(
                        "The round has not started yet".to_string(),
                    ));
                    return;
                };
                let event = match self
                    .usecases
                    .record_typing
                    .execute(&self.room, &uid, tracker, &edit)
                    .await
                {
                    Ok(stats) => SessionEvent::Stats(stats),
                    Err(e) => SessionEvent::Notice(e.to_string()),
                };
                self.emit(event);
            }
            SessionCommand::SetReady(ready) => {
                let usecase = self.usecases.set_ready.clone();
                self.spawn_action(actions, async move { usecase.execute(&id, &uid, ready).await });
            }
            SessionCommand::UpdateSettings(update) => {
                let usecase = self.usecases.update_settings.clone();
                self.spawn_action(actions, async move {
                    usecase.execute(&id, &uid, update).await.map(|_| ())
                });
            }
            SessionCommand::Start => {
                let usecase = self.usecases.start_round.clone();
                self.spawn_action(actions, async move {
                    usecase.execute(&id, &uid).await.map(|_| ())
                });
            }
            SessionCommand::Rematch => {
                let usecase = self.usecases.rematch.clone();
                self.spawn_action(actions, async move { usecase.execute(&id, &uid).await });
            }
            SessionCommand::Leave => {
                self.leave().await;
            }
        }
    }

    /// 退出済みなら `true`
    async fn leave(&mut self) -> bool {
        match self
            .usecases
            .leave
            .execute(&self.room_id, &self.identity.uid)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                self.emit(SessionEvent::Notice(e.to_string()));
                false
            }
        }
    }

    async fn on_internal(&mut self, message: Internal) {
        match message {
            Internal::CountdownElapsed(key) if self.timers.is_armed(&key) => {
                if let Err(e) = self.usecases.begin_play.execute(&self.room_id).await {
                    warn!("Failed to start play in room {}: {}", self.room_id, e);
                }
            }
            Internal::ArbiterTick(key) if self.timers.is_armed(&key) => {
                if let Err(e) = self.usecases.check_termination.execute(&self.room).await {
                    warn!("Failed to finish room {}: {}", self.room_id, e);
                }
            }
            Internal::RefreshTick(key) if self.timers.is_armed(&key) => {
                let Some(tracker) = self.tracker.as_mut() else {
                    return;
                };
                let refreshed = self
                    .usecases
                    .record_typing
                    .refresh(&self.room, &self.identity.uid, tracker)
                    .await;
                match refreshed {
                    Ok(Some(stats)) => self.emit(SessionEvent::Stats(stats)),
                    Ok(None) => {}
                    Err(e) => debug!("Skipped WPM refresh: {}", e),
                }
            }
            Internal::CountdownElapsed(_) | Internal::ArbiterTick(_) | Internal::RefreshTick(_) => {
                debug!("Dropped tick of a stale round in room {}", self.room_id);
            }
            Internal::Notice(message) => self.emit(SessionEvent::Notice(message)),
            Internal::Recorded(profile) => self.emit(SessionEvent::ResultRecorded(profile)),
        }
    }
}
