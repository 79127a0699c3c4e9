//! Recording notification publisher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use clubevents_core::notification::{
    NotificationMessage, NotificationPublisher, NotificationType, PublishError,
};

/// [`NotificationPublisher`] that keeps every message it accepts.
///
/// While failing, messages are rejected and not recorded.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<NotificationMessage>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<NotificationMessage> {
        self.published.lock().unwrap().clone()
    }

    pub fn published_of(&self, kind: NotificationType) -> Vec<NotificationMessage> {
        self.published()
            .into_iter()
            .filter(|m| m.notification_type == kind)
            .collect()
    }

    /// Receivers of everything published so far, sorted.
    pub fn receivers(&self) -> Vec<String> {
        let mut receivers: Vec<String> =
            self.published().into_iter().map(|m| m.receiver).collect();
        receivers.sort();
        receivers
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Connection("broker unreachable".to_string()));
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }
}
