//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    create_room, get_profile, get_room, get_rooms, health_check, record_result, update_room,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
