//! Outbound notification messages and the publisher capability.
//!
//! A notification is built inside one service operation and handed to a
//! [`NotificationPublisher`] straight away; the service never tracks it after
//! that, so every message leaves with status [`STATUS_PENDING`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Durable destination all event notifications are published to.
pub const DEFAULT_QUEUE_NAME: &str = "event_notifications";

/// Status carried by every freshly composed message.
pub const STATUS_PENDING: &str = "pending";

/// Fallback name when the acting user cannot be resolved.
const UNKNOWN_USER_NAME: &str = "Someone";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "event_update")]
    Update,
    #[serde(rename = "event_delete")]
    Delete,
    #[serde(rename = "event_join")]
    Join,
    #[serde(rename = "event_leave")]
    Leave,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::Update => "event_update",
            NotificationType::Delete => "event_delete",
            NotificationType::Join => "event_join",
            NotificationType::Leave => "event_leave",
        }
    }
}

/// Wire format published to the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub notification_type: NotificationType,
    pub sender: String,
    /// Resolved at send time; empty when the directory lookup failed.
    pub receiver: String,
    pub subject: String,
    pub body_message: String,
    pub status: String,
}

impl NotificationMessage {
    pub fn has_receiver(&self) -> bool {
        !self.receiver.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

/// Builds the messages for each kind of event state change.
#[derive(Debug, Clone)]
pub struct NotificationComposer {
    sender: String,
}

impl NotificationComposer {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }

    /// Tell a participant the event details changed.
    ///
    /// `organizer_email` is included as a contact line when known.
    pub fn event_updated(
        &self,
        event: &Event,
        organizer_email: Option<&str>,
        receiver: &str,
    ) -> NotificationMessage {
        let mut body = format!(
            "The event \"{}\" has been updated.\n\
             When: {}\n\
             Where: {}\n\
             Capacity: {}/{}\n",
            event.title,
            event.datetime,
            event.location,
            event.current_participation,
            event.max_participation,
        );
        if !event.description.is_empty() {
            body.push_str(&format!("Details: {}\n", event.description));
        }
        match organizer_email.filter(|e| !e.is_empty()) {
            Some(email) => body.push_str(&format!(
                "Organizer: {} <{}>",
                event.created_by_name, email
            )),
            None => body.push_str(&format!("Organizer: {}", event.created_by_name)),
        }

        self.message(
            NotificationType::Update,
            receiver,
            format!("Event Update: {}", event.title),
            body,
        )
    }

    /// Tell a former participant the event was cancelled.
    pub fn event_deleted(&self, event: &Event, receiver: &str) -> NotificationMessage {
        let body = format!(
            "The event \"{}\" scheduled for {} at {} has been cancelled by {}.",
            event.title, event.datetime, event.location, event.created_by_name,
        );
        self.message(
            NotificationType::Delete,
            receiver,
            format!("Event Delete: {}", event.title),
            body,
        )
    }

    /// Tell the organizer someone joined.
    pub fn participant_joined(
        &self,
        event: &Event,
        participant_name: Option<&str>,
        current_participation: i64,
        receiver: &str,
    ) -> NotificationMessage {
        let body = format!(
            "{} joined your event \"{}\". Seats taken: {}/{}.",
            display_name(participant_name),
            event.title,
            current_participation,
            event.max_participation,
        );
        self.message(
            NotificationType::Join,
            receiver,
            format!("Event Join: {}", event.title),
            body,
        )
    }

    /// Tell the organizer someone left.
    pub fn participant_left(
        &self,
        event: &Event,
        participant_name: Option<&str>,
        current_participation: i64,
        receiver: &str,
    ) -> NotificationMessage {
        let body = format!(
            "{} left your event \"{}\". Seats taken: {}/{}.",
            display_name(participant_name),
            event.title,
            current_participation,
            event.max_participation,
        );
        self.message(
            NotificationType::Leave,
            receiver,
            format!("Event Leave: {}", event.title),
            body,
        )
    }

    fn message(
        &self,
        notification_type: NotificationType,
        receiver: &str,
        subject: String,
        body_message: String,
    ) -> NotificationMessage {
        NotificationMessage {
            notification_type,
            sender: self.sender.clone(),
            receiver: receiver.to_string(),
            subject,
            body_message,
            status: STATUS_PENDING.to_string(),
        }
    }
}

fn display_name(name: Option<&str>) -> &str {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_USER_NAME)
}

// ---------------------------------------------------------------------------
// Publisher capability
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The broker could not be reached or refused the connection.
    #[error("Broker connection failed: {0}")]
    Connection(String),

    /// Declaring the destination queue failed.
    #[error("Queue declaration failed: {0}")]
    Declare(String),

    #[error("Message serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The broker client refused to enqueue the message.
    #[error("Publish failed: {0}")]
    Send(String),
}

/// Hands a message to the durable notification queue.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), PublishError>;
}
