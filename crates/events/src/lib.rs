//! Outbound collaborators of the club events service.
//!
//! - [`HttpDirectoryClient`] resolves user ids against the external user
//!   directory over HTTP.
//! - [`AmqpNotificationPublisher`] hands notification messages to the
//!   durable `event_notifications` queue on a RabbitMQ broker.

pub mod directory;
pub mod queue;

pub use directory::{DirectoryConfig, HttpDirectoryClient};
pub use queue::{AmqpNotificationPublisher, QueueConfig};
