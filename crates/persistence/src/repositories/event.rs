//! Event repository: the Postgres `EventLedger` plus read-view queries.

use async_trait::async_trait;
use domain::models::event::NewEvent;
use domain::models::{Event, InviteStatus, Invitation};
use domain::services::capacity::{self, CapacityShift};
use domain::services::{EventLedger, JoinOutcome, ReconcileOutcome};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EventDetailEntity, EventEntity, InvitationEntity, InviteStatusDb};
use crate::metrics::QueryTimer;

/// Repository for events and their invitation ledger.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Event row joined with course and host names, for read views.
    pub async fn find_detail(
        &self,
        event_id: Uuid,
    ) -> Result<Option<EventDetailEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_detail");
        let result = sqlx::query_as::<_, EventDetailEntity>(
            r#"
            SELECT
                e.id, e.course_id, e.date, e.tee_time, e.open_spots,
                e.number_of_holes, e.private, e.host_id,
                c.name as course_name, p.name as host_name
            FROM events e
            JOIN courses c ON e.course_id = c.id
            JOIN players p ON e.host_id = p.id
            WHERE e.id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Player ids holding an invitation in the given status for an event.
    pub async fn list_player_ids_by_status(
        &self,
        event_id: Uuid,
        status: InviteStatus,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_player_ids_by_status");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT player_id FROM invitations
            WHERE event_id = $1 AND status = $2
            ORDER BY created_at
            "#,
        )
        .bind(event_id)
        .bind(InviteStatusDb::from(status))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All event ids, newest first.
    pub async fn list_event_ids(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM events ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Public event ids, newest first.
    pub async fn list_public_event_ids(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_event_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM events WHERE private = false ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Ids of events a player holds any invitation for, newest first.
    pub async fn list_event_ids_by_player(
        &self,
        player_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_event_ids_by_player");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT e.id FROM events e
            JOIN invitations i ON i.event_id = e.id
            WHERE i.player_id = $1
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an event. Invitations go with it via the cascade constraint.
    pub async fn delete_event(&self, event_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EventLedger for EventRepository {
    async fn create_event_with_invitations(
        &self,
        event: &NewEvent,
        invitees: &[Uuid],
    ) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("create_event_with_invitations");

        // One transaction: the event is never visible with a partial
        // invitee set.
        let mut tx = self.pool.begin().await?;

        let event_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO events (course_id, date, tee_time, open_spots, number_of_holes, private, host_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(event.course_id)
        .bind(event.date)
        .bind(&event.tee_time)
        .bind(event.open_spots)
        .bind(&event.number_of_holes)
        .bind(event.private)
        .bind(event.host_id)
        .fetch_one(&mut *tx)
        .await?;

        // The host always holds an Accepted invitation.
        sqlx::query("INSERT INTO invitations (player_id, event_id, status) VALUES ($1, $2, $3)")
            .bind(event.host_id)
            .bind(event_id)
            .bind(InviteStatusDb::Accepted)
            .execute(&mut *tx)
            .await?;

        let fan_out: Vec<Uuid> = if event.private {
            invitees.to_vec()
        } else {
            sqlx::query_scalar("SELECT id FROM players WHERE id <> $1")
                .bind(event.host_id)
                .fetch_all(&mut *tx)
                .await?
        };

        for player_id in fan_out {
            sqlx::query(
                "INSERT INTO invitations (player_id, event_id, status) VALUES ($1, $2, $3)",
            )
            .bind(player_id)
            .bind(event_id)
            .bind(InviteStatusDb::Pending)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(event_id)
    }

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, course_id, date, tee_time, open_spots, number_of_holes, private, host_id, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|entity| entity.map(Event::from))
    }

    async fn find_invitation(
        &self,
        player_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, player_id, event_id, status, created_at, updated_at
            FROM invitations
            WHERE player_id = $1 AND event_id = $2
            "#,
        )
        .bind(player_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|entity| entity.map(Invitation::from))
    }

    async fn set_invitation_status(
        &self,
        player_id: Uuid,
        event_id: Uuid,
        status: InviteStatus,
    ) -> Result<Option<Invitation>, sqlx::Error> {
        let timer = QueryTimer::new("set_invitation_status");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            UPDATE invitations
            SET status = $3, updated_at = now()
            WHERE player_id = $1 AND event_id = $2
            RETURNING id, player_id, event_id, status, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(event_id)
        .bind(InviteStatusDb::from(status))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|entity| entity.map(Invitation::from))
    }

    async fn insert_accepted_if_open(
        &self,
        player_id: Uuid,
        event_id: Uuid,
    ) -> Result<JoinOutcome, sqlx::Error> {
        let timer = QueryTimer::new("insert_accepted_if_open");

        // The row lock on the event serializes concurrent joins; the
        // capacity re-check below happens under that lock, so two joins
        // cannot both take the last spot.
        let mut tx = self.pool.begin().await?;

        let open_spots: Option<i32> =
            sqlx::query_scalar("SELECT open_spots FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(open_spots) = open_spots else {
            return Ok(JoinOutcome::UnknownEvent);
        };

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM invitations WHERE player_id = $1 AND event_id = $2",
        )
        .bind(player_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Ok(JoinOutcome::AlreadyInvited);
        }

        let accepted: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invitations WHERE event_id = $1 AND status = $2")
                .bind(event_id)
                .bind(InviteStatusDb::Accepted)
                .fetch_one(&mut *tx)
                .await?;
        if capacity::remaining_spots(open_spots, accepted) <= 0 {
            return Ok(JoinOutcome::EventFull);
        }

        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (player_id, event_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, player_id, event_id, status, created_at, updated_at
            "#,
        )
        .bind(player_id)
        .bind(event_id)
        .bind(InviteStatusDb::Accepted)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(JoinOutcome::Joined(entity.into()))
    }

    async fn reconcile_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<ReconcileOutcome>, sqlx::Error> {
        let timer = QueryTimer::new("reconcile_event");

        // count → decide → bulk-update runs as one unit under the event
        // row lock, so a concurrent accept/join cannot slip between the
        // count and the update.
        let mut tx = self.pool.begin().await?;

        let open_spots: Option<i32> =
            sqlx::query_scalar("SELECT open_spots FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(open_spots) = open_spots else {
            return Ok(None);
        };

        let accepted: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invitations WHERE event_id = $1 AND status = $2")
                .bind(event_id)
                .bind(InviteStatusDb::Accepted)
                .fetch_one(&mut *tx)
                .await?;

        let (from, to) = match capacity::required_shift(open_spots, accepted) {
            CapacityShift::ClosePending => (InviteStatusDb::Pending, InviteStatusDb::Closed),
            CapacityShift::ReopenClosed => (InviteStatusDb::Closed, InviteStatusDb::Pending),
        };

        let changed = sqlx::query(
            "UPDATE invitations SET status = $3, updated_at = now() WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(from)
        .bind(to)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        timer.record();

        let (closed, reopened) = match to {
            InviteStatusDb::Closed => (changed, 0),
            _ => (0, changed),
        };
        Ok(Some(ReconcileOutcome {
            remaining_spots: capacity::remaining_spots(open_spots, accepted),
            closed,
            reopened,
        }))
    }
}
