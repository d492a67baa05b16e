//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use typerace_core::domain::{
    GameResult, LeaderboardStore, Room, RoomId, RoomPatch, RoomStore, UserId, UserProfile,
};

use crate::{error::ApiError, infrastructure::dto::http::RoomSummaryDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// List every room (operator/debug view)
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.store.rooms().await;
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Store a new room document
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(room): Json<Room>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    state.store.create(room.clone()).await?;
    tracing::info!("Room {} created", room.id);
    Ok((StatusCode::CREATED, Json(room)))
}

/// Get room document by ID
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let id = RoomId::parse(&room_id)?;
    let room = state.store.get(&id).await?;
    Ok(Json(room))
}

/// Merge a partial update into a room document
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(patch): Json<RoomPatch>,
) -> Result<StatusCode, ApiError> {
    let id = RoomId::parse(&room_id)?;
    state.store.merge_update(&id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a game result and return the refreshed profile
pub async fn record_result(
    State(state): State<Arc<AppState>>,
    Json(result): Json<GameResult>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.leaderboard.record_result(result).await?;
    tracing::info!(
        "Result recorded for {} (best {} wpm over {} games)",
        profile.uid,
        profile.best_wpm,
        profile.games_played
    );
    Ok(Json(profile))
}

/// Get a user's profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    let uid = UserId::new(uid)?;
    state
        .leaderboard
        .profile(&uid)
        .await
        .map(Json)
        .ok_or(ApiError::ProfileNotFound(uid))
}
