//! Thin HTTP client for the room host API.

use reqwest::{Response, StatusCode};
use typerace_core::domain::{RoomId, StoreError};
use typerace_server::infrastructure::dto::http::ErrorDto;

/// Base URLs and connection pool shared by the remote stores.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    ws_url: String,
}

impl ApiClient {
    /// `server_url` is the host root, e.g. `http://127.0.0.1:8080`.
    pub fn new(server_url: &str) -> Self {
        let base_url = server_url.trim_end_matches('/').to_string();
        let ws_url = match base_url.split_once("://") {
            Some(("https", rest)) => format!("wss://{rest}"),
            Some((_, rest)) => format!("ws://{rest}"),
            None => format!("ws://{base_url}"),
        };
        let base_url = if base_url.contains("://") {
            base_url
        } else {
            format!("http://{base_url}")
        };
        Self {
            http: reqwest::Client::new(),
            base_url,
            ws_url,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub fn room_socket(&self, id: &RoomId) -> String {
        format!("{}/ws/rooms/{}", self.ws_url, id)
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

/// Pass successful responses through; turn error statuses into [`StoreError`].
pub(crate) async fn check(response: Response, room: Option<&RoomId>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorDto>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(status_error(status, message, room))
}

fn status_error(status: StatusCode, message: String, room: Option<&RoomId>) -> StoreError {
    match (status, room) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id.clone()),
        (StatusCode::CONFLICT, Some(id)) => StoreError::AlreadyExists(id.clone()),
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
            StoreError::Rejected(message)
        }
        (StatusCode::PRECONDITION_FAILED, _) => StoreError::Stale(message),
        _ => StoreError::Unavailable(format!("{status}: {message}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_server_scheme() {
        // テスト項目: サーバー URL から HTTP / WebSocket の URL を組み立てる
        // given (前提条件):
        let id = RoomId::parse("ABC123").unwrap();

        // when (操作):
        let plain = ApiClient::new("http://localhost:8080/");
        let secure = ApiClient::new("https://typerace.example");
        let bare = ApiClient::new("127.0.0.1:9000");

        // then (期待する結果):
        assert_eq!(plain.api("/rooms"), "http://localhost:8080/api/rooms");
        assert_eq!(plain.room_socket(&id), "ws://localhost:8080/ws/rooms/ABC123");
        assert_eq!(secure.room_socket(&id), "wss://typerace.example/ws/rooms/ABC123");
        assert_eq!(bare.api("/health"), "http://127.0.0.1:9000/api/health");
    }

    #[test]
    fn test_status_codes_map_to_store_errors() {
        // テスト項目: HTTP ステータスが StoreError に変換される
        // given (前提条件):
        let id = RoomId::parse("ABC123").unwrap();

        // when (操作) / then (期待する結果):
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, String::new(), Some(&id)),
            StoreError::NotFound(id.clone())
        );
        assert_eq!(
            status_error(StatusCode::CONFLICT, String::new(), Some(&id)),
            StoreError::AlreadyExists(id.clone())
        );
        assert_eq!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, "bad".to_string(), Some(&id)),
            StoreError::Rejected("bad".to_string())
        );
        assert_eq!(
            status_error(StatusCode::PRECONDITION_FAILED, "moved on".to_string(), Some(&id)),
            StoreError::Stale("moved on".to_string())
        );
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "down".to_string(), None),
            StoreError::Unavailable(_)
        ));
    }
}
