//! Canned user directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use clubevents_core::directory::{DirectoryClient, DirectoryError, UserProfile};

/// [`DirectoryClient`] answering from a map. Unknown ids get HTTP 404.
#[derive(Default)]
pub struct StubDirectory {
    profiles: RwLock<HashMap<String, UserProfile>>,
    unavailable: AtomicBool,
    delay: RwLock<Option<Duration>>,
    lookups: AtomicUsize,
}

impl StubDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `user_id` as `name <user_id@example.com>`.
    pub fn with_user(self, user_id: &str, name: &str) -> Self {
        self.add_user(user_id, name);
        self
    }

    pub fn add_user(&self, user_id: &str, name: &str) {
        self.profiles.write().unwrap().insert(
            user_id.to_string(),
            UserProfile {
                user_id: user_id.to_string(),
                display_name: name.to_string(),
                email: email_of(user_id),
            },
        );
    }

    /// Fail every lookup with a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Sleep this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

/// The address [`StubDirectory::add_user`] assigns.
pub fn email_of(user_id: &str) -> String {
    format!("{user_id}@example.com")
}

#[async_trait]
impl DirectoryClient for StubDirectory {
    async fn resolve(&self, user_id: &str) -> Result<UserProfile, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DirectoryError::Request("connection refused".to_string()));
        }

        self.profiles
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or(DirectoryError::HttpStatus(404))
    }
}
