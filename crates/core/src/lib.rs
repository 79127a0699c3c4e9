//! Domain types and capability traits for the club events service.
//!
//! This crate has no I/O of its own. It defines:
//!
//! - [`event::Event`] and [`participation::Participation`], the two stored
//!   record kinds, plus the inputs used to create and change them.
//! - [`notification::NotificationMessage`] and the composer that turns a
//!   state change into outbound messages.
//! - The capability traits implemented by the infrastructure crates:
//!   [`store::EventStore`], [`directory::DirectoryClient`] and
//!   [`notification::NotificationPublisher`].

pub mod directory;
pub mod error;
pub mod event;
pub mod notification;
pub mod participation;
pub mod store;
pub mod types;
