//! Repository for the `event_participations` table.
//!
//! [`ParticipationRepo::join`] and [`ParticipationRepo::leave`] touch both
//! tables inside one transaction so the participation row and the counter on
//! `events` never disagree.

use clubevents_core::participation::{Participation, SeatClaim, SeatRelease};
use clubevents_core::types::EventId;
use sqlx::PgPool;

use crate::models::participation::ParticipationRow;

/// Column list for `event_participations` queries.
const COLUMNS: &str = "event_id, user_id, created_at";

pub struct ParticipationRepo;

impl ParticipationRepo {
    pub async fn find(
        pool: &PgPool,
        event_id: EventId,
        user_id: &str,
    ) -> Result<Option<Participation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_participations WHERE event_id = $1 AND user_id = $2"
        );
        let row = sqlx::query_as::<_, ParticipationRow>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Participation::from))
    }

    /// Participants of one event, earliest sign-up first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: EventId,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_participations \
             WHERE event_id = $1 ORDER BY created_at, user_id"
        );
        let rows = sqlx::query_as::<_, ParticipationRow>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Participation::from).collect())
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<Participation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_participations \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, ParticipationRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Participation::from).collect())
    }

    pub async fn count_for_event(pool: &PgPool, event_id: EventId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM event_participations WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    /// Remove all participations of an event. Returns the number removed.
    pub async fn delete_for_event(pool: &PgPool, event_id: EventId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_participations WHERE event_id = $1")
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Claim a seat: insert the participation and increment the counter.
    ///
    /// The event row is locked with `FOR UPDATE` first, so concurrent joins
    /// on the same event are serialized and the capacity check cannot be
    /// overtaken. Capacity is checked before the duplicate check.
    pub async fn join(
        pool: &PgPool,
        event_id: EventId,
        user_id: &str,
    ) -> Result<SeatClaim, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seats: Option<(i64, i64)> = sqlx::query_as(
            "SELECT current_participation, max_participation \
             FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((current, max)) = seats else {
            return Ok(SeatClaim::EventMissing);
        };
        if current >= max {
            return Ok(SeatClaim::Full);
        }

        let inserted = sqlx::query(
            "INSERT INTO event_participations (event_id, user_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_event_participations_event_user DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(SeatClaim::AlreadyJoined);
        }

        let current_participation: i64 = sqlx::query_scalar(
            "UPDATE events SET current_participation = current_participation + 1 \
             WHERE id = $1 \
             RETURNING current_participation",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SeatClaim::Claimed {
            current_participation,
        })
    }

    /// Release a seat: delete the participation and decrement the counter.
    pub async fn leave(
        pool: &PgPool,
        event_id: EventId,
        user_id: &str,
    ) -> Result<SeatRelease, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM event_participations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Ok(SeatRelease::NotParticipating);
        }

        // The event may already be gone if a delete raced us; the
        // participation removal still stands.
        let current_participation: Option<i64> = sqlx::query_scalar(
            "UPDATE events \
             SET current_participation = GREATEST(current_participation - 1, 0) \
             WHERE id = $1 \
             RETURNING current_participation",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SeatRelease::Released {
            current_participation: current_participation.unwrap_or(0),
        })
    }
}
