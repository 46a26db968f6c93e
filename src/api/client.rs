//! API client for the remote user source.
//!
//! This module provides the `ApiClient` struct for fetching the user
//! collection. The endpoint is read-only and unauthenticated; it is
//! called at most once per session, and only when no local cache exists.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::User;

// ============================================================================
// Constants
// ============================================================================

/// Default URL for the user collection endpoint
const DEFAULT_USERS_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the remote user source.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    users_url: String,
}

impl ApiClient {
    /// Create a new API client pointing at the default endpoint
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            users_url: DEFAULT_USERS_URL.to_string(),
        })
    }

    /// Override the user collection URL (from config)
    pub fn with_users_url(mut self, url: impl Into<String>) -> Self {
        self.users_url = url.into();
        self
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(super::ApiError::from_status(status, &body).into())
        }
    }

    /// Fetch the full user collection. Single attempt, no retry; any
    /// transport or parse failure surfaces as an error for the caller
    /// to treat as "no data available".
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let response = self
            .client
            .get(&self.users_url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch users from {}", self.users_url))?;

        let response = Self::check_response(response).await?;

        let text = response
            .text()
            .await
            .context("Failed to read users response body")?;
        debug!(bytes = text.len(), "Users response received");

        Self::parse_users(&text)
    }

    /// Parse the response body as a user collection.
    /// Tries a direct array first, then common wrapper formats.
    fn parse_users(text: &str) -> Result<Vec<User>> {
        if let Ok(users) = serde_json::from_str::<Vec<User>>(text) {
            return Ok(users);
        }

        #[derive(Deserialize)]
        struct UsersWrapper {
            users: Option<Vec<User>>,
            data: Option<Vec<User>>,
        }

        // A present-but-empty list is a valid (empty) collection; only a
        // payload with neither key falls through to the parse error.
        if let Ok(wrapper) = serde_json::from_str::<UsersWrapper>(text) {
            if let Some(users) = wrapper.users.or(wrapper.data) {
                return Ok(users);
            }
        }

        let snippet: String = text.chars().take(200).collect();
        Err(anyhow::anyhow!(
            "Failed to parse users response. Response starts with: {}",
            snippet
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_direct_array() {
        let json = r#"[
            {"id": 1, "name": "Ann", "username": "ann1", "email": "a@x.com"},
            {"id": 2, "name": "Bo", "username": "bo99", "email": "b@x.com"}
        ]"#;

        let users = ApiClient::parse_users(json).expect("Failed to parse users array");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Ann");
        assert_eq!(users[1].id, 2);
    }

    #[test]
    fn test_parse_users_wrapped() {
        let json = r#"{"users": [{"id": 5, "name": "Cy", "username": "cy", "email": "c@x.com"}]}"#;
        let users = ApiClient::parse_users(json).expect("Failed to parse wrapped users");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 5);

        let json = r#"{"data": [{"id": 9, "name": "Di", "username": "di", "email": "d@x.com"}]}"#;
        let users = ApiClient::parse_users(json).expect("Failed to parse data-wrapped users");
        assert_eq!(users[0].id, 9);
    }

    #[test]
    fn test_parse_users_wrapped_empty() {
        let users = ApiClient::parse_users(r#"{"users": []}"#).expect("Empty list is valid");
        assert!(users.is_empty());

        let users = ApiClient::parse_users(r#"{"data": []}"#).expect("Empty list is valid");
        assert!(users.is_empty());

        // An object with neither key is not a user collection
        assert!(ApiClient::parse_users(r#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_parse_users_garbage() {
        assert!(ApiClient::parse_users("not json at all").is_err());
    }

    #[test]
    fn test_parse_users_garbage_multibyte() {
        // Unparseable multibyte bodies longer than the quoted snippet must
        // produce an error, not a panic on a mid-character cut.
        let body = "é".repeat(300);
        assert!(ApiClient::parse_users(&body).is_err());
    }
}
