//! Data Transfer Objects (DTOs)

pub mod http;
pub mod websocket;
