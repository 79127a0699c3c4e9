use std::sync::Arc;

use clubevents_core::event::Event;
use clubevents_service::{EventService, ServiceConfig};
use clubevents_testing::fixtures::{new_event, ORGANIZER_ID, ORGANIZER_NAME};
use clubevents_testing::{InMemoryEventStore, RecordingPublisher, StubDirectory};

/// The service wired to in-memory doubles, with handles on each double.
pub struct Harness {
    pub service: EventService,
    pub store: Arc<InMemoryEventStore>,
    pub directory: Arc<StubDirectory>,
    pub publisher: Arc<RecordingPublisher>,
}

impl Harness {
    /// Create an event with the given capacity and return it.
    pub async fn event_with_capacity(&self, max_participation: i64) -> Event {
        self.service
            .create_event(new_event("Board game night", max_participation))
            .await
            .unwrap()
    }

    pub fn current_participation(&self, event: &Event) -> i64 {
        self.store
            .snapshot_event(event.id)
            .unwrap()
            .current_participation
    }
}

/// Build a harness whose directory knows the organizer, alice, bob and carol.
pub fn harness() -> Harness {
    harness_with_config(ServiceConfig::default())
}

pub fn harness_with_config(config: ServiceConfig) -> Harness {
    let store = Arc::new(InMemoryEventStore::new());
    let directory = Arc::new(
        StubDirectory::new()
            .with_user(ORGANIZER_ID, ORGANIZER_NAME)
            .with_user("alice", "Alice Archer")
            .with_user("bob", "Bob Baker")
            .with_user("carol", "Carol Cook"),
    );
    let publisher = Arc::new(RecordingPublisher::new());

    let service = EventService::new(
        store.clone(),
        directory.clone(),
        publisher.clone(),
        config,
    );

    Harness {
        service,
        store,
        directory,
        publisher,
    }
}
