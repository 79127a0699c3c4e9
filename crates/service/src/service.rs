//! The event/participation service.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use clubevents_core::directory::{DirectoryClient, UserProfile};
use clubevents_core::error::CoreError;
use clubevents_core::event::{sort_newest_first, Event, EventChanges, EventFilter, NewEvent};
use clubevents_core::notification::{NotificationComposer, NotificationPublisher};
use clubevents_core::participation::{JoinOutcome, LeaveOutcome, SeatClaim, SeatRelease};
use clubevents_core::store::EventStore;
use clubevents_core::types::{new_event_id, now, parse_event_id, validate_user_id, EventId};
use futures::future::join_all;

use crate::config::ServiceConfig;
use crate::dispatch::{Mutation, NotificationDispatcher};

/// Orchestrates the event store, the user directory and the notification
/// publisher. Collaborators are injected at construction; the service holds
/// no other state and is cheap to share behind an `Arc`.
pub struct EventService {
    store: Arc<dyn EventStore>,
    directory: Arc<dyn DirectoryClient>,
    dispatcher: NotificationDispatcher,
    composer: NotificationComposer,
    directory_timeout: Duration,
}

impl EventService {
    pub fn new(
        store: Arc<dyn EventStore>,
        directory: Arc<dyn DirectoryClient>,
        publisher: Arc<dyn NotificationPublisher>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher: NotificationDispatcher::new(publisher, config.publish_timeout),
            composer: NotificationComposer::new(config.sender_address),
            directory_timeout: config.directory_timeout,
        }
    }

    /// `true` when the backing store answers.
    pub async fn store_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    // -----------------------------------------------------------------------
    // Create / read
    // -----------------------------------------------------------------------

    /// Persist a new event. No notification is sent.
    pub async fn create_event(&self, input: NewEvent) -> Result<Event, CoreError> {
        input.validate()?;

        let event = Event::from_new(new_event_id(), input, now());
        self.store.insert_event(&event).await?;

        tracing::info!(
            event_id = %event.id,
            created_by = %event.created_by_id,
            club_id = %event.club_id,
            max_participation = event.max_participation,
            "Event created"
        );
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, CoreError> {
        let id = parse_event_id(id)?;
        self.load_event(id).await
    }

    pub async fn get_all_events(&self) -> Result<Vec<Event>, CoreError> {
        Ok(self.store.find_events(&EventFilter::All).await?)
    }

    /// Events created by `creator_id`, newest first.
    pub async fn get_events_by_user(&self, creator_id: &str) -> Result<Vec<Event>, CoreError> {
        let creator_id = validate_user_id(creator_id)?;
        Ok(self
            .store
            .find_events(&EventFilter::CreatedBy(creator_id.to_string()))
            .await?)
    }

    /// Events of one club, newest first.
    pub async fn get_events_by_club(&self, club_id: &str) -> Result<Vec<Event>, CoreError> {
        Ok(self
            .store
            .find_events(&EventFilter::Club(club_id.trim().to_string()))
            .await?)
    }

    /// Case-insensitive substring search over title and description.
    ///
    /// An empty query matches every event, so `("", Some(club))` lists a club.
    pub async fn search_events(
        &self,
        query: &str,
        club_id: Option<&str>,
    ) -> Result<Vec<Event>, CoreError> {
        Ok(self
            .store
            .find_events(&EventFilter::search(query, club_id))
            .await?)
    }

    /// Events `user_id` participates in, newest first.
    pub async fn get_participated_events(&self, user_id: &str) -> Result<Vec<Event>, CoreError> {
        let user_id = validate_user_id(user_id)?;
        let participations = self.store.list_participations_for_user(user_id).await?;

        let mut seen = HashSet::new();
        let ids: Vec<EventId> = participations
            .into_iter()
            .map(|p| p.event_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let mut events = self.store.find_events_by_ids(&ids).await?;
        sort_newest_first(&mut events);
        Ok(events)
    }

    // -----------------------------------------------------------------------
    // Update / delete
    // -----------------------------------------------------------------------

    /// Overwrite the five mutable fields and notify every current participant.
    pub async fn update_event(
        &self,
        id: &str,
        changes: EventChanges,
    ) -> Result<Mutation<Event>, CoreError> {
        let id = parse_event_id(id)?;
        changes.validate()?;

        let existing = self.load_event(id).await?;
        changes.check_against(&existing)?;

        self.store
            .update_event(id, &changes, now())
            .await?
            .into_result(id, changes.max_participation)?;
        let event = self.load_event(id).await?;
        tracing::info!(event_id = %id, "Event updated");

        let recipients = match self.store.list_participations_for_event(id).await {
            Ok(participations) => participations.into_iter().map(|p| p.user_id).collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    event_id = %id,
                    "Could not list participants, skipping update notifications"
                );
                Vec::new()
            }
        };

        let (organizer, receivers) = tokio::join!(
            self.resolve(&event.created_by_id),
            self.resolve_emails(&recipients),
        );
        let organizer_email = organizer.as_ref().map(|p| p.email.as_str());

        let messages = receivers
            .iter()
            .map(|receiver| self.composer.event_updated(&event, organizer_email, receiver))
            .collect();
        let deliveries = self.dispatcher.dispatch(messages).await;

        Ok(Mutation {
            value: event,
            deliveries,
        })
    }

    /// Delete the event, then its participations, then notify former
    /// participants.
    ///
    /// A failure in either delete step aborts with an error and sends
    /// nothing. A failure in the second step leaves the event deleted and
    /// its participations orphaned; there is no rollback.
    pub async fn delete_event(&self, id: &str) -> Result<Mutation<bool>, CoreError> {
        let id = parse_event_id(id)?;

        let event = self.load_event(id).await?;
        let participants: Vec<String> = self
            .store
            .list_participations_for_event(id)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();

        if !self.store.delete_event(id).await? {
            return Err(CoreError::event_not_found(id));
        }

        let purged = match self.store.delete_participations_for_event(id).await {
            Ok(purged) => purged,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_id = %id,
                    "Event deleted but participations could not be purged"
                );
                return Err(e.into());
            }
        };
        tracing::info!(event_id = %id, purged, "Event deleted");

        let receivers = self.resolve_emails(&participants).await;
        let messages = receivers
            .iter()
            .map(|receiver| self.composer.event_deleted(&event, receiver))
            .collect();
        let deliveries = self.dispatcher.dispatch(messages).await;

        Ok(Mutation {
            value: true,
            deliveries,
        })
    }

    // -----------------------------------------------------------------------
    // Participation
    // -----------------------------------------------------------------------

    /// Join an event.
    ///
    /// A full event or an existing participation is a rejected outcome, not
    /// an error. Only a successful join notifies the organizer.
    pub async fn join_event(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Mutation<JoinOutcome>, CoreError> {
        let id = parse_event_id(event_id)?;
        let user_id = validate_user_id(user_id)?;

        let event = self.load_event(id).await?;
        if event.is_full() {
            tracing::debug!(event_id = %id, user_id, "Join rejected, event full");
            return Ok(Mutation::quiet(JoinOutcome::EventFull));
        }
        if self.store.find_participation(id, user_id).await?.is_some() {
            tracing::debug!(event_id = %id, user_id, "Join rejected, already joined");
            return Ok(Mutation::quiet(JoinOutcome::AlreadyJoined));
        }

        let current_participation = match self.store.join_event(id, user_id).await? {
            SeatClaim::Claimed {
                current_participation,
            } => current_participation,
            SeatClaim::Full => return Ok(Mutation::quiet(JoinOutcome::EventFull)),
            SeatClaim::AlreadyJoined => return Ok(Mutation::quiet(JoinOutcome::AlreadyJoined)),
            SeatClaim::EventMissing => return Err(CoreError::event_not_found(id)),
        };
        tracing::info!(event_id = %id, user_id, current_participation, "User joined event");

        let (participant, organizer) =
            tokio::join!(self.resolve(user_id), self.resolve(&event.created_by_id));
        let message = self.composer.participant_joined(
            &event,
            participant.as_ref().map(|p| p.display_name.as_str()),
            current_participation,
            organizer.as_ref().map_or("", |p| p.email.as_str()),
        );
        let deliveries = self.dispatcher.dispatch(vec![message]).await;

        Ok(Mutation {
            value: JoinOutcome::Joined,
            deliveries,
        })
    }

    /// Leave an event. Not participating is a rejected outcome, not an error.
    pub async fn leave_event(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Mutation<LeaveOutcome>, CoreError> {
        let id = parse_event_id(event_id)?;
        let user_id = validate_user_id(user_id)?;

        let event = self.load_event(id).await?;
        if self.store.find_participation(id, user_id).await?.is_none() {
            tracing::debug!(event_id = %id, user_id, "Leave rejected, not participating");
            return Ok(Mutation::quiet(LeaveOutcome::NotParticipating));
        }

        let current_participation = match self.store.leave_event(id, user_id).await? {
            SeatRelease::Released {
                current_participation,
            } => current_participation,
            SeatRelease::NotParticipating => {
                return Ok(Mutation::quiet(LeaveOutcome::NotParticipating))
            }
        };
        tracing::info!(event_id = %id, user_id, current_participation, "User left event");

        let (participant, organizer) =
            tokio::join!(self.resolve(user_id), self.resolve(&event.created_by_id));
        let message = self.composer.participant_left(
            &event,
            participant.as_ref().map(|p| p.display_name.as_str()),
            current_participation,
            organizer.as_ref().map_or("", |p| p.email.as_str()),
        );
        let deliveries = self.dispatcher.dispatch(vec![message]).await;

        Ok(Mutation {
            value: LeaveOutcome::Left,
            deliveries,
        })
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn load_event(&self, id: EventId) -> Result<Event, CoreError> {
        self.store
            .find_event(id)
            .await?
            .ok_or_else(|| CoreError::event_not_found(id))
    }

    /// Directory lookup bounded by the configured timeout.
    ///
    /// Failures are logged and yield `None`.
    async fn resolve(&self, user_id: &str) -> Option<UserProfile> {
        match tokio::time::timeout(self.directory_timeout, self.directory.resolve(user_id)).await
        {
            Ok(Ok(profile)) => Some(profile),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, user_id, "Directory lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    user_id,
                    timeout_ms = self.directory_timeout.as_millis() as u64,
                    "Directory lookup timed out"
                );
                None
            }
        }
    }

    /// Email of each user, in order; empty where the lookup failed.
    async fn resolve_emails(&self, user_ids: &[String]) -> Vec<String> {
        join_all(user_ids.iter().map(|user_id| self.resolve(user_id)))
            .await
            .into_iter()
            .map(|profile| profile.map(|p| p.email).unwrap_or_default())
            .collect()
    }
}
