//! User directory capability: user id to display name and contact address.

use async_trait::async_trait;

/// The parts of a directory profile the event service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Network, DNS or timeout failure.
    #[error("Directory request failed: {0}")]
    Request(String),

    /// The directory answered with a non-2xx status.
    #[error("Directory returned HTTP {0}")]
    HttpStatus(u16),

    /// The body was not the expected profile JSON.
    #[error("Directory response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<UserProfile, DirectoryError>;
}
