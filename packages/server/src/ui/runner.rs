//! Router assembly and server lifecycle.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};
use tower_http::trace::TraceLayer;
use typerace_core::infrastructure::InMemoryRoomStore;

use super::{handler, signal::shutdown_signal, state::AppState};

/// Bind address and housekeeping cadence of the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often rooms with both seats empty are dropped
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Build the router with all routes and middleware.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/rooms", get(handler::get_rooms).post(handler::create_room))
        .route(
            "/api/rooms/{room_id}",
            get(handler::get_room).patch(handler::update_room),
        )
        .route("/api/results", post(handler::record_result))
        .route("/api/profiles/{uid}", get(handler::get_profile))
        .route("/ws/rooms/{room_id}", get(handler::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically reclaim abandoned rooms until the handle is aborted.
pub fn spawn_sweeper(store: Arc<InMemoryRoomStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let reclaimed = store.reclaim_abandoned().await;
            if !reclaimed.is_empty() {
                tracing::info!("Sweeper reclaimed {} room(s)", reclaimed.len());
            }
        }
    })
}

/// Run the server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::default());
    let sweeper = spawn_sweeper(state.store.clone(), config.sweep_interval);
    let app = build_app(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    tracing::info!("Server stopped");
    served
}
