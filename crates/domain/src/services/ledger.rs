//! The persistence capability consumed by the invitation lifecycle.
//!
//! The trait is object-safe and constructed once per request; the Postgres
//! implementation lives in the persistence crate, and the domain tests run
//! against an in-memory implementation. The three multi-row operations
//! (`create_event_with_invitations`, `insert_accepted_if_open`,
//! `reconcile_event`) are atomic inside each implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::event::NewEvent;
use crate::models::{Event, InviteStatus, Invitation};

/// Result of an `insert_accepted_if_open` attempt.
///
/// The capacity check and the insert are serialized per event inside the
/// implementation, so two concurrent joins for the last spot cannot both
/// come back `Joined`.
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    Joined(Invitation),
    AlreadyInvited,
    EventFull,
    UnknownEvent,
}

/// Row counts from one reconcile pass.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOutcome {
    pub remaining_spots: i64,
    pub closed: u64,
    pub reopened: u64,
}

/// Durable storage for events and their invitation ledger.
#[async_trait]
pub trait EventLedger: Send + Sync {
    /// Atomically insert the event, the host's Accepted invitation, and the
    /// Pending fan-out (the given list for private events, every other
    /// known player for public ones). Rolls back entirely on any failure.
    async fn create_event_with_invitations(
        &self,
        event: &NewEvent,
        invitees: &[Uuid],
    ) -> Result<Uuid, sqlx::Error>;

    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>, sqlx::Error>;

    async fn find_invitation(
        &self,
        player_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<Invitation>, sqlx::Error>;

    /// Write a new status on the invitation for (player, event). Returns
    /// `None` when no such invitation exists.
    async fn set_invitation_status(
        &self,
        player_id: Uuid,
        event_id: Uuid,
        status: InviteStatus,
    ) -> Result<Option<Invitation>, sqlx::Error>;

    /// Insert an Accepted invitation for a direct join, re-checking
    /// remaining capacity under the event lock.
    async fn insert_accepted_if_open(
        &self,
        player_id: Uuid,
        event_id: Uuid,
    ) -> Result<JoinOutcome, sqlx::Error>;

    /// Recount accepted invitations and apply the required Pending↔Closed
    /// shift, all inside one per-event critical section. Returns `None`
    /// when the event does not exist.
    async fn reconcile_event(
        &self,
        event_id: Uuid,
    ) -> Result<Option<ReconcileOutcome>, sqlx::Error>;
}
