//! HTTP API and WebSocket subscription integration tests.

mod fixtures;

use std::time::Duration;

use fixtures::TestServer;
use futures_util::StreamExt;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite};
use typerace_core::domain::{
    GameMode, GameResult, Identity, Player, Room, RoomId, RoomPatch, RoomStatus, RoomStore, Seat,
    Timestamp, UserId, UserProfile,
};
use typerace_server::infrastructure::dto::websocket::RoomFrame;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

fn identity(uid: &str) -> Identity {
    Identity::new(UserId::new(uid.to_string()).unwrap(), None)
}

fn new_room(code: &str) -> Room {
    Room::new(
        RoomId::parse(code).unwrap(),
        &identity("alice"),
        Timestamp::new(1_700_000_000_000),
    )
}

fn join_patch(uid: &str) -> RoomPatch {
    let guest = identity(uid);
    RoomPatch::new()
        .seat(Seat::Player2, Some(&Player::guest(&guest)))
        .guest_id(Some(&guest.uid))
        .status(RoomStatus::Ready)
}

async fn create(client: &reqwest::Client, server: &TestServer, room: &Room) -> reqwest::Response {
    client
        .post(format!("{}/api/rooms", server.base_url()))
        .json(room)
        .send()
        .await
        .expect("Failed to send request")
}

async fn next_frame(ws: &mut WsStream) -> RoomFrame {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let tungstenite::Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Failed to parse frame");
        }
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_get_room() {
    // テスト項目: 作成したルームを ID で取得できる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room = new_room("ABC123");

    // when (操作):
    let created = create(&client, &server, &room).await;
    let fetched = client
        .get(format!("{}/api/rooms/abc123", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(created.status(), 201);
    assert_eq!(fetched.status(), 200);
    let body: Room = fetched.json().await.expect("Failed to parse JSON");
    assert_eq!(body, room);
}

#[tokio::test]
async fn test_create_duplicate_room_conflicts() {
    // テスト項目: 同じ ID のルームを二度作成すると 409 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room = new_room("DUPE01");
    create(&client, &server, &room).await;

    // when (操作):
    let response = create(&client, &server, &room).await;

    // then (期待する結果):
    assert_eq!(response.status(), 409);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("DUPE01"));
}

#[tokio::test]
async fn test_room_detail_not_found_and_bad_id() {
    // テスト項目: 存在しないルームは 404、不正な ID は 400 を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let missing = client
        .get(format!("{}/api/rooms/ZZZZZZ", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");
    let invalid = client
        .get(format!("{}/api/rooms/nope", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(missing.status(), 404);
    assert_eq!(invalid.status(), 400);
}

#[tokio::test]
async fn test_rooms_list_endpoint() {
    // テスト項目: /api/rooms がルームの一覧を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    create(&client, &server, &new_room("LIST01")).await;

    // when (操作):
    let response = client
        .get(format!("{}/api/rooms", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let rooms = body.as_array().expect("Response should be an array");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["id"], "LIST01");
    assert_eq!(rooms[0]["status"], "waiting");
    assert_eq!(rooms[0]["players"][0], "Player 1");
    assert!(rooms[0]["created_at"].is_string());
}

#[tokio::test]
async fn test_patch_merges_fields() {
    // テスト項目: PATCH で指定したフィールドだけが更新される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    create(&client, &server, &new_room("MERGE1")).await;

    // when (操作):
    let response = client
        .patch(format!("{}/api/rooms/MERGE1", server.base_url()))
        .json(&join_patch("bob"))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 204);
    let room: Room = client
        .get(format!("{}/api/rooms/MERGE1", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(room.status, RoomStatus::Ready);
    assert_eq!(room.guest_id.as_ref().map(UserId::as_str), Some("bob"));
    assert_eq!(room.player1.as_ref().map(|p| p.name.as_str()), Some("Player 1"));
}

#[tokio::test]
async fn test_patch_violating_invariants_is_rejected() {
    // テスト項目: 不変条件を破る PATCH は 422 になり、ドキュメントは変わらない
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room = new_room("GUARD1");
    create(&client, &server, &room).await;

    // when (操作): 課題文なしで playing にする
    let response = client
        .patch(format!("{}/api/rooms/GUARD1", server.base_url()))
        .json(&RoomPatch::new().status(RoomStatus::Playing))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 422);
    let stored = server
        .state
        .store
        .rooms()
        .await
        .into_iter()
        .next()
        .expect("room should still exist");
    assert_eq!(stored, room);
}

#[tokio::test]
async fn test_patch_with_failed_precondition_is_stale() {
    // テスト項目: 前提条件を満たさない PATCH は 412 になり、ドキュメントは変わらない
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room = new_room("STALE1");
    create(&client, &server, &room).await;
    let patch = RoomPatch::new()
        .expect_status(RoomStatus::Playing)
        .seat_ready(Seat::Player1, false);

    // when (操作):
    let response = client
        .patch(format!("{}/api/rooms/STALE1", server.base_url()))
        .json(&patch)
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 412);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("status")));
    let stored = server
        .state
        .store
        .get(&room.id)
        .await
        .expect("room should still exist");
    assert_eq!(stored, room);
}

#[tokio::test]
async fn test_record_result_updates_profile() {
    // テスト項目: 結果を記録するとプロフィールの最高記録が更新される
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let uid = UserId::new("alice".to_string()).unwrap();
    let first = GameResult::new(
        uid.clone(),
        "Alice".to_string(),
        48,
        97,
        GameMode::Duel,
        Timestamp::new(1_000),
    );
    let second = GameResult::new(
        uid,
        "Alice".to_string(),
        61,
        90,
        GameMode::Test,
        Timestamp::new(2_000),
    );

    // when (操作):
    for result in [&first, &second] {
        let response = client
            .post(format!("{}/api/results", server.base_url()))
            .json(result)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);
    }
    let profile: UserProfile = client
        .get(format!("{}/api/profiles/alice", server.base_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // then (期待する結果):
    assert_eq!(profile.best_wpm, 61);
    assert_eq!(profile.best_accuracy, 97);
    assert_eq!(profile.games_played, 2);
    assert_eq!(profile.last_played, Timestamp::new(2_000));
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    // テスト項目: 記録のないユーザーのプロフィールは 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/profiles/nobody", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_websocket_streams_snapshots() {
    // テスト項目: 購読直後に現在のスナップショット、更新ごとに新しいスナップショットが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let room = new_room("LIVE01");
    create(&client, &server, &room).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(server.ws_url("LIVE01"))
        .await
        .expect("Failed to connect");

    // when (操作):
    let initial = next_frame(&mut ws).await;
    client
        .patch(format!("{}/api/rooms/LIVE01", server.base_url()))
        .json(&join_patch("bob"))
        .send()
        .await
        .expect("Failed to send request");
    let updated = next_frame(&mut ws).await;

    // then (期待する結果):
    assert_eq!(initial, RoomFrame::Snapshot { room });
    match updated {
        RoomFrame::Snapshot { room } => {
            assert_eq!(room.status, RoomStatus::Ready);
            assert!(room.player2.is_some());
        }
        other => panic!("expected a snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn test_websocket_announces_reclaimed_room() {
    // テスト項目: ルームが回収されると room-closed フレームが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    create(&client, &server, &new_room("GONE01")).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(server.ws_url("GONE01"))
        .await
        .expect("Failed to connect");
    next_frame(&mut ws).await;

    // when (操作): ホストが抜けて空室になり、回収される
    client
        .patch(format!("{}/api/rooms/GONE01", server.base_url()))
        .json(&RoomPatch::new().seat(Seat::Player1, None).host_id(None))
        .send()
        .await
        .expect("Failed to send request");
    next_frame(&mut ws).await;
    let reclaimed = server.state.store.reclaim_abandoned().await;

    // then (期待する結果):
    assert_eq!(reclaimed.len(), 1);
    assert_eq!(
        next_frame(&mut ws).await,
        RoomFrame::RoomClosed {
            room_id: RoomId::parse("GONE01").unwrap()
        }
    );
}

#[tokio::test]
async fn test_websocket_unknown_room_is_refused() {
    // テスト項目: 存在しないルームの購読はハンドシェイク時に 404 で拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = tokio_tungstenite::connect_async(server.ws_url("NOROOM")).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 404),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("subscription to an unknown room should fail"),
    }
}
