//! Test doubles for the clubevents capability traits.
//!
//! - [`InMemoryEventStore`]: a complete [`EventStore`](clubevents_core::store::EventStore)
//!   with per-operation failure injection and a call counter
//! - [`StubDirectory`]: canned user profiles, optional failure or delay
//! - [`RecordingPublisher`]: captures every published message
//! - [`fixtures`]: builders for event inputs and stored events

#![allow(clippy::unwrap_used)] // Poisoned locks only happen after a test already panicked

pub mod directory;
pub mod fixtures;
pub mod publisher;
pub mod store;

pub use directory::StubDirectory;
pub use publisher::RecordingPublisher;
pub use store::{InMemoryEventStore, StoreOp};
