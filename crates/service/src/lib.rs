//! The club event/participation service.
//!
//! [`EventService`] enforces the participation rules (capacity, one
//! participation per user and event), coordinates the event and
//! participation collections through an injected
//! [`EventStore`](clubevents_core::store::EventStore), and fans out
//! notifications through a [`NotificationDispatcher`].
//!
//! Every mutating operation returns a [`Mutation`]: the primary result plus a
//! report of each notification it produced. Notification problems show up in
//! that report and in the logs, never as an operation error.

pub mod config;
pub mod dispatch;
pub mod service;

pub use config::ServiceConfig;
pub use dispatch::{Delivery, DeliveryStatus, Mutation, NotificationDispatcher};
pub use service::EventService;
