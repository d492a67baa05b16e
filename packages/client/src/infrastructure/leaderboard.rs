//! Leaderboard backed by the remote room host.

use async_trait::async_trait;
use reqwest::StatusCode;
use typerace_core::domain::{GameResult, LeaderboardStore, StoreError, UserId, UserProfile};

use super::http::{ApiClient, check, transport_error};

pub struct RemoteLeaderboard {
    api: ApiClient,
}

impl RemoteLeaderboard {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The user's profile, or `None` before their first recorded result.
    pub async fn profile(&self, uid: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let response = self
            .api
            .http()
            .get(self.api.api(&format!("/profiles/{uid}")))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check(response, None)
            .await?
            .json()
            .await
            .map(Some)
            .map_err(transport_error)
    }
}

#[async_trait]
impl LeaderboardStore for RemoteLeaderboard {
    async fn record_result(&self, result: GameResult) -> Result<UserProfile, StoreError> {
        let response = self
            .api
            .http()
            .post(self.api.api("/results"))
            .json(&result)
            .send()
            .await
            .map_err(transport_error)?;
        check(response, None)
            .await?
            .json()
            .await
            .map_err(transport_error)
    }
}
