//! HTTP client for the user directory service.
//!
//! `GET {base}/users/{id}` returns a JSON profile; anything other than a
//! 2xx response is an error. Each request is bounded by
//! [`DirectoryConfig::timeout`].

use std::time::Duration;

use async_trait::async_trait;
use clubevents_core::directory::{DirectoryClient, DirectoryError, UserProfile};
use reqwest::Url;
use serde::Deserialize;

/// Default directory base URL for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl DirectoryConfig {
    /// Read `USER_SERVICE_URL` (default `http://localhost:8080`).
    ///
    /// The per-request timeout is owned by the service configuration and
    /// passed in, so both layers agree on one deadline.
    pub fn from_env(timeout: Duration) -> Self {
        let base_url =
            std::env::var("USER_SERVICE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self { base_url, timeout }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// Profile JSON as served by the directory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryUser {
    id: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    #[allow(dead_code)]
    picture: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    created_at: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    updated_at: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    last_login: Option<String>,
}

impl From<DirectoryUser> for UserProfile {
    fn from(user: DirectoryUser) -> Self {
        UserProfile {
            user_id: user.id,
            display_name: user.full_name,
            email: user.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDirectoryClient {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DirectoryError::Request(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::Request(format!(
                "invalid base URL: {}",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectoryError::Request(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// `{base}/users/{user_id}` with the id percent-encoded as one segment.
    fn user_url(&self, user_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(user_id);
        }
        url
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn resolve(&self, user_id: &str) -> Result<UserProfile, DirectoryError> {
        let url = self.user_url(user_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DirectoryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DirectoryError::HttpStatus(response.status().as_u16()));
        }

        let user: DirectoryUser = response
            .json()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))?;

        tracing::debug!(user_id, "Resolved user from directory");
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn client(base: &str) -> HttpDirectoryClient {
        HttpDirectoryClient::new(DirectoryConfig {
            base_url: base.to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn user_url_appends_segments() {
        assert_eq!(
            client("http://dir.local").user_url("u-1").as_str(),
            "http://dir.local/users/u-1"
        );
        assert_eq!(
            client("http://dir.local/api/").user_url("u-1").as_str(),
            "http://dir.local/api/users/u-1"
        );
    }

    #[test]
    fn user_url_encodes_id_as_one_segment() {
        assert_eq!(
            client("http://dir.local").user_url("a/b").as_str(),
            "http://dir.local/users/a%2Fb"
        );
    }

    #[test]
    fn from_env_uses_the_timeout_it_is_given() {
        let config = DirectoryConfig::from_env(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpDirectoryClient::new(DirectoryConfig {
            base_url: "not a url".into(),
            timeout: Duration::from_secs(1),
        });
        assert_matches!(result, Err(DirectoryError::Request(_)));
    }

    #[test]
    fn profile_maps_full_name_and_email() {
        let user: DirectoryUser = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "picture": "https://img/ada.png",
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-02",
            "lastLogin": "2024-01-03"
        }))
        .unwrap();
        let profile = UserProfile::from(user);
        assert_eq!(profile.display_name, "Ada Lovelace");
        assert_eq!(profile.email, "ada@example.com");
    }
}
