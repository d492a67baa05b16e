//! Infrastructure layer
//!
//! HTTP / WebSocket でやり取りする DTO を定義します。

pub mod dto;
