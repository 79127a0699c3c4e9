//! Notification dispatch boundary.
//!
//! [`NotificationDispatcher`] publishes the messages an operation produced
//! and reports what happened to each one. It never returns an error: publish
//! failures and timeouts are logged and recorded as [`DeliveryStatus::Failed`].

use std::sync::Arc;
use std::time::Duration;

use clubevents_core::notification::{NotificationMessage, NotificationPublisher};
use futures::future::join_all;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Delivery report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Published,
    /// Not attempted, e.g. because the receiver could not be resolved.
    Skipped(String),
    Failed(String),
}

/// One produced notification and its fate.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    pub message: NotificationMessage,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

/// Result of a mutating operation plus the notifications it produced.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub value: T,
    pub deliveries: Vec<Delivery>,
}

impl<T> Mutation<T> {
    /// A result that produced no notifications.
    pub fn quiet(value: T) -> Self {
        Self {
            value,
            deliveries: Vec::new(),
        }
    }

    /// Transform the result, keeping the delivery report.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        Mutation {
            value: f(self.value),
            deliveries: self.deliveries,
        }
    }

    pub fn published_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Published)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct NotificationDispatcher {
    publisher: Arc<dyn NotificationPublisher>,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(publisher: Arc<dyn NotificationPublisher>, timeout: Duration) -> Self {
        Self { publisher, timeout }
    }

    /// Publish every message concurrently, each bounded by the timeout.
    ///
    /// The returned deliveries are in the same order as `messages`.
    pub async fn dispatch(&self, messages: Vec<NotificationMessage>) -> Vec<Delivery> {
        join_all(messages.into_iter().map(|message| self.dispatch_one(message))).await
    }

    async fn dispatch_one(&self, message: NotificationMessage) -> Delivery {
        if !message.has_receiver() {
            tracing::warn!(
                notification_type = message.notification_type.as_str(),
                subject = %message.subject,
                "Skipping notification without receiver"
            );
            return Delivery {
                message,
                status: DeliveryStatus::Skipped("no receiver address".to_string()),
            };
        }

        let status =
            match tokio::time::timeout(self.timeout, self.publisher.publish(&message)).await {
                Ok(Ok(())) => DeliveryStatus::Published,
                Ok(Err(e)) => {
                    tracing::warn!(
                        error = %e,
                        notification_type = message.notification_type.as_str(),
                        receiver = %message.receiver,
                        "Failed to publish notification"
                    );
                    DeliveryStatus::Failed(e.to_string())
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        notification_type = message.notification_type.as_str(),
                        receiver = %message.receiver,
                        "Notification publish timed out"
                    );
                    DeliveryStatus::Failed(format!(
                        "publish timed out after {}ms",
                        self.timeout.as_millis()
                    ))
                }
            };

        Delivery { message, status }
    }
}
