//! Entry points for the invitation lifecycle.
//!
//! Event creation fans out invitations atomically; every status mutation is
//! followed by an unconditional reconcile pass that restores the capacity
//! invariant (pending invitations close when the event fills, closed ones
//! reopen when a spot frees).

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::event::NewEvent;
use crate::models::{InviteStatus, Invitation};
use crate::services::ledger::{EventLedger, JoinOutcome, ReconcileOutcome};

/// Failures surfaced by the lifecycle entry points.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Create an event together with its full invitee fan-out.
///
/// The invitee list is deduplicated and the host removed before it reaches
/// the ledger; the ledger inserts everything in one transaction, so no
/// partial event/invitation state is ever observable.
pub async fn create_event(
    ledger: &dyn EventLedger,
    event: NewEvent,
    invitees: Vec<Uuid>,
) -> Result<Uuid, EventError> {
    let invitees = dedup_invitees(event.host_id, invitees);
    let event_id = ledger
        .create_event_with_invitations(&event, &invitees)
        .await?;

    info!(
        event_id = %event_id,
        host_id = %event.host_id,
        private = event.private,
        open_spots = event.open_spots,
        "Event created"
    );
    Ok(event_id)
}

fn dedup_invitees(host_id: Uuid, invitees: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    invitees
        .into_iter()
        .filter(|id| *id != host_id && seen.insert(*id))
        .collect()
}

/// Update one invitation's status, then reconcile the event's capacity.
///
/// `status` arrives as a symbolic name; unrecognized names are rejected
/// before anything is written. A reconcile failure after the committed
/// write is surfaced so the unmet cascade stays visible.
pub async fn update_invitation_status(
    ledger: &dyn EventLedger,
    player_id: Uuid,
    event_id: Uuid,
    status: &str,
) -> Result<Invitation, EventError> {
    let parsed = InviteStatus::parse(status)
        .ok_or_else(|| EventError::Validation("Invalid invitation status".to_string()))?;

    let invitation = ledger
        .set_invitation_status(player_id, event_id, parsed)
        .await?
        .ok_or_else(|| EventError::NotFound("Invitation not found".to_string()))?;

    reconcile(ledger, event_id).await?;
    Ok(invitation)
}

/// Join an event directly, without a prior invitation.
///
/// Rejected when the pair already holds an invitation (any status) or when
/// the event has no remaining capacity; the capacity re-check happens
/// inside the ledger's per-event critical section.
pub async fn join_event(
    ledger: &dyn EventLedger,
    player_id: Uuid,
    event_id: Uuid,
) -> Result<Invitation, EventError> {
    if ledger.find_invitation(player_id, event_id).await?.is_some() {
        return Err(EventError::Conflict(
            "Player already has an invitation for this event".to_string(),
        ));
    }
    if ledger.find_event(event_id).await?.is_none() {
        return Err(EventError::NotFound("Event not found".to_string()));
    }

    let invitation = match ledger.insert_accepted_if_open(player_id, event_id).await? {
        JoinOutcome::Joined(invitation) => invitation,
        JoinOutcome::AlreadyInvited => {
            return Err(EventError::Conflict(
                "Player already has an invitation for this event".to_string(),
            ))
        }
        JoinOutcome::EventFull => {
            return Err(EventError::Conflict("Event is full".to_string()));
        }
        JoinOutcome::UnknownEvent => {
            return Err(EventError::NotFound("Event not found".to_string()));
        }
    };

    info!(player_id = %player_id, event_id = %event_id, "Player joined event");

    // The join may have taken the last spot.
    reconcile(ledger, event_id).await?;
    Ok(invitation)
}

/// Recompute remaining capacity and cascade Pending↔Closed transitions.
///
/// Idempotent: a pure function of the current accepted count, safe to call
/// after any mutation without knowing which direction capacity moved.
pub async fn reconcile(
    ledger: &dyn EventLedger,
    event_id: Uuid,
) -> Result<ReconcileOutcome, EventError> {
    let outcome = ledger
        .reconcile_event(event_id)
        .await?
        .ok_or_else(|| EventError::NotFound("Event not found".to_string()))?;

    if outcome.closed > 0 || outcome.reopened > 0 {
        info!(
            event_id = %event_id,
            remaining = outcome.remaining_spots,
            closed = outcome.closed,
            reopened = outcome.reopened,
            "Cascaded invitation statuses"
        );
    } else {
        debug!(event_id = %event_id, remaining = outcome.remaining_spots, "Reconciled, no changes");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::capacity::{required_shift, CapacityShift};
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory `EventLedger` used to exercise the lifecycle without a
    /// database. Mirrors the Postgres implementation's semantics, including
    /// routing reconcile decisions through `capacity::required_shift`.
    #[derive(Default)]
    struct InMemoryLedger {
        state: Mutex<LedgerState>,
        fail_reconcile: AtomicBool,
    }

    #[derive(Default)]
    struct LedgerState {
        players: Vec<Uuid>,
        events: Vec<crate::models::Event>,
        invitations: Vec<Invitation>,
    }

    impl InMemoryLedger {
        fn with_players(count: usize) -> (Self, Vec<Uuid>) {
            let ledger = Self::default();
            let ids: Vec<Uuid> = (0..count).map(|_| Uuid::new_v4()).collect();
            ledger.state.lock().unwrap().players = ids.clone();
            (ledger, ids)
        }

        fn invitations_for(&self, event_id: Uuid) -> Vec<Invitation> {
            self.state
                .lock()
                .unwrap()
                .invitations
                .iter()
                .filter(|i| i.event_id == event_id)
                .cloned()
                .collect()
        }

        fn status_of(&self, player_id: Uuid, event_id: Uuid) -> Option<InviteStatus> {
            self.state
                .lock()
                .unwrap()
                .invitations
                .iter()
                .find(|i| i.player_id == player_id && i.event_id == event_id)
                .map(|i| i.status)
        }

        fn inject_reconcile_failure(&self) {
            self.fail_reconcile.store(true, Ordering::SeqCst);
        }
    }

    fn new_invitation(player_id: Uuid, event_id: Uuid, status: InviteStatus) -> Invitation {
        let now = Utc::now();
        Invitation {
            id: Uuid::new_v4(),
            player_id,
            event_id,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl EventLedger for InMemoryLedger {
        async fn create_event_with_invitations(
            &self,
            event: &NewEvent,
            invitees: &[Uuid],
        ) -> Result<Uuid, sqlx::Error> {
            let mut state = self.state.lock().unwrap();
            let event_id = Uuid::new_v4();
            state.events.push(crate::models::Event {
                id: event_id,
                course_id: event.course_id,
                date: event.date,
                tee_time: event.tee_time.clone(),
                open_spots: event.open_spots,
                number_of_holes: event.number_of_holes.clone(),
                private: event.private,
                host_id: event.host_id,
                created_at: Utc::now(),
            });
            state.invitations.push(new_invitation(
                event.host_id,
                event_id,
                InviteStatus::Accepted,
            ));

            let fan_out: Vec<Uuid> = if event.private {
                invitees.to_vec()
            } else {
                state
                    .players
                    .iter()
                    .copied()
                    .filter(|id| *id != event.host_id)
                    .collect()
            };
            for player_id in fan_out {
                state
                    .invitations
                    .push(new_invitation(player_id, event_id, InviteStatus::Pending));
            }
            Ok(event_id)
        }

        async fn find_event(
            &self,
            event_id: Uuid,
        ) -> Result<Option<crate::models::Event>, sqlx::Error> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .events
                .iter()
                .find(|e| e.id == event_id)
                .cloned())
        }

        async fn find_invitation(
            &self,
            player_id: Uuid,
            event_id: Uuid,
        ) -> Result<Option<Invitation>, sqlx::Error> {
            Ok(self
                .state
                .lock()
                .unwrap()
                .invitations
                .iter()
                .find(|i| i.player_id == player_id && i.event_id == event_id)
                .cloned())
        }

        async fn set_invitation_status(
            &self,
            player_id: Uuid,
            event_id: Uuid,
            status: InviteStatus,
        ) -> Result<Option<Invitation>, sqlx::Error> {
            let mut state = self.state.lock().unwrap();
            let invitation = state
                .invitations
                .iter_mut()
                .find(|i| i.player_id == player_id && i.event_id == event_id);
            Ok(invitation.map(|i| {
                i.status = status;
                i.updated_at = Utc::now();
                i.clone()
            }))
        }

        async fn insert_accepted_if_open(
            &self,
            player_id: Uuid,
            event_id: Uuid,
        ) -> Result<JoinOutcome, sqlx::Error> {
            let mut state = self.state.lock().unwrap();
            let Some(open_spots) = state
                .events
                .iter()
                .find(|e| e.id == event_id)
                .map(|e| e.open_spots)
            else {
                return Ok(JoinOutcome::UnknownEvent);
            };
            if state
                .invitations
                .iter()
                .any(|i| i.player_id == player_id && i.event_id == event_id)
            {
                return Ok(JoinOutcome::AlreadyInvited);
            }
            let accepted = state
                .invitations
                .iter()
                .filter(|i| i.event_id == event_id && i.status == InviteStatus::Accepted)
                .count() as i64;
            if crate::services::capacity::remaining_spots(open_spots, accepted) <= 0 {
                return Ok(JoinOutcome::EventFull);
            }
            let invitation = new_invitation(player_id, event_id, InviteStatus::Accepted);
            state.invitations.push(invitation.clone());
            Ok(JoinOutcome::Joined(invitation))
        }

        async fn reconcile_event(
            &self,
            event_id: Uuid,
        ) -> Result<Option<ReconcileOutcome>, sqlx::Error> {
            if self.fail_reconcile.load(Ordering::SeqCst) {
                return Err(sqlx::Error::Protocol(
                    "injected reconcile failure".to_string(),
                ));
            }
            let mut state = self.state.lock().unwrap();
            let Some(open_spots) = state
                .events
                .iter()
                .find(|e| e.id == event_id)
                .map(|e| e.open_spots)
            else {
                return Ok(None);
            };
            let accepted = state
                .invitations
                .iter()
                .filter(|i| i.event_id == event_id && i.status == InviteStatus::Accepted)
                .count() as i64;

            let (from, to) = match required_shift(open_spots, accepted) {
                CapacityShift::ClosePending => (InviteStatus::Pending, InviteStatus::Closed),
                CapacityShift::ReopenClosed => (InviteStatus::Closed, InviteStatus::Pending),
            };
            let mut changed = 0u64;
            for invitation in state
                .invitations
                .iter_mut()
                .filter(|i| i.event_id == event_id && i.status == from)
            {
                invitation.status = to;
                changed += 1;
            }
            let (closed, reopened) = match to {
                InviteStatus::Closed => (changed, 0),
                _ => (0, changed),
            };
            Ok(Some(ReconcileOutcome {
                remaining_spots: crate::services::capacity::remaining_spots(open_spots, accepted),
                closed,
                reopened,
            }))
        }
    }

    fn new_event(host_id: Uuid, open_spots: i32, private: bool) -> NewEvent {
        NewEvent {
            course_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            tee_time: "9:30 AM".to_string(),
            open_spots,
            number_of_holes: "18".to_string(),
            private,
            host_id,
        }
    }

    /// remaining > 0 ⇒ no Closed invitation; remaining ≤ 0 ⇒ no Pending.
    fn assert_capacity_invariant(ledger: &InMemoryLedger, event_id: Uuid, open_spots: i32) {
        let invitations = ledger.invitations_for(event_id);
        let accepted = invitations
            .iter()
            .filter(|i| i.status == InviteStatus::Accepted)
            .count() as i64;
        let remaining = crate::services::capacity::remaining_spots(open_spots, accepted);
        if remaining > 0 {
            assert!(
                !invitations.iter().any(|i| i.status == InviteStatus::Closed),
                "closed invitation with {} spots remaining",
                remaining
            );
        } else {
            assert!(
                !invitations
                    .iter()
                    .any(|i| i.status == InviteStatus::Pending),
                "pending invitation on a full event"
            );
        }
    }

    #[tokio::test]
    async fn test_create_private_event_fans_out_to_invitees_only() {
        let (ledger, players) = InMemoryLedger::with_players(5);
        let host = players[0];
        let invitees = vec![players[1], players[2]];

        let event_id = create_event(&ledger, new_event(host, 4, true), invitees)
            .await
            .unwrap();

        let invitations = ledger.invitations_for(event_id);
        assert_eq!(invitations.len(), 3);
        assert_eq!(ledger.status_of(host, event_id), Some(InviteStatus::Accepted));
        assert_eq!(
            ledger.status_of(players[1], event_id),
            Some(InviteStatus::Pending)
        );
        assert_eq!(
            ledger.status_of(players[2], event_id),
            Some(InviteStatus::Pending)
        );
        assert_eq!(ledger.status_of(players[3], event_id), None);
    }

    #[tokio::test]
    async fn test_create_public_event_fans_out_to_everyone_else() {
        let (ledger, players) = InMemoryLedger::with_players(4);
        let host = players[0];

        let event_id = create_event(&ledger, new_event(host, 4, false), vec![])
            .await
            .unwrap();

        let invitations = ledger.invitations_for(event_id);
        assert_eq!(invitations.len(), 4);
        assert_eq!(ledger.status_of(host, event_id), Some(InviteStatus::Accepted));
        for player in &players[1..] {
            assert_eq!(
                ledger.status_of(*player, event_id),
                Some(InviteStatus::Pending)
            );
        }
    }

    #[tokio::test]
    async fn test_host_in_invitee_list_still_gets_one_accepted_invitation() {
        let (ledger, players) = InMemoryLedger::with_players(3);
        let host = players[0];
        let invitees = vec![host, players[1], players[1]];

        let event_id = create_event(&ledger, new_event(host, 2, true), invitees)
            .await
            .unwrap();

        let invitations = ledger.invitations_for(event_id);
        assert_eq!(invitations.len(), 2);
        let host_invitations: Vec<_> = invitations
            .iter()
            .filter(|i| i.player_id == host)
            .collect();
        assert_eq!(host_invitations.len(), 1);
        assert_eq!(host_invitations[0].status, InviteStatus::Accepted);
    }

    #[tokio::test]
    async fn test_accepting_last_spot_closes_remaining_pending() {
        let (ledger, players) = InMemoryLedger::with_players(3);
        let host = players[0];
        let event_id = create_event(
            &ledger,
            new_event(host, 2, true),
            vec![players[1], players[2]],
        )
        .await
        .unwrap();

        update_invitation_status(&ledger, players[1], event_id, "accepted")
            .await
            .unwrap();

        assert_eq!(
            ledger.status_of(players[1], event_id),
            Some(InviteStatus::Accepted)
        );
        assert_eq!(
            ledger.status_of(players[2], event_id),
            Some(InviteStatus::Closed)
        );
        assert_capacity_invariant(&ledger, event_id, 2);
    }

    #[tokio::test]
    async fn test_decline_on_full_event_reopens_closed() {
        let (ledger, players) = InMemoryLedger::with_players(3);
        let host = players[0];
        let event_id = create_event(
            &ledger,
            new_event(host, 2, true),
            vec![players[1], players[2]],
        )
        .await
        .unwrap();
        update_invitation_status(&ledger, players[1], event_id, "accepted")
            .await
            .unwrap();
        assert_eq!(
            ledger.status_of(players[2], event_id),
            Some(InviteStatus::Closed)
        );

        update_invitation_status(&ledger, players[1], event_id, "declined")
            .await
            .unwrap();

        assert_eq!(
            ledger.status_of(players[2], event_id),
            Some(InviteStatus::Pending)
        );
        assert_capacity_invariant(&ledger, event_id, 2);
    }

    #[tokio::test]
    async fn test_join_fills_last_spot_and_closes_pending() {
        let (ledger, players) = InMemoryLedger::with_players(4);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 2, true), vec![players[1]])
            .await
            .unwrap();

        let invitation = join_event(&ledger, players[2], event_id).await.unwrap();

        assert_eq!(invitation.status, InviteStatus::Accepted);
        assert_eq!(
            ledger.status_of(players[1], event_id),
            Some(InviteStatus::Closed)
        );
        assert_capacity_invariant(&ledger, event_id, 2);
    }

    #[tokio::test]
    async fn test_join_full_event_conflicts_and_creates_no_row() {
        let (ledger, players) = InMemoryLedger::with_players(4);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 1, true), vec![])
            .await
            .unwrap();

        let before = ledger.invitations_for(event_id).len();
        let result = join_event(&ledger, players[1], event_id).await;

        assert!(matches!(result, Err(EventError::Conflict(_))));
        assert_eq!(ledger.invitations_for(event_id).len(), before);
    }

    #[tokio::test]
    async fn test_second_join_for_same_pair_conflicts() {
        let (ledger, players) = InMemoryLedger::with_players(4);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 3, true), vec![])
            .await
            .unwrap();

        join_event(&ledger, players[1], event_id).await.unwrap();
        let second = join_event(&ledger, players[1], event_id).await;

        assert!(matches!(second, Err(EventError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_join_unknown_event_not_found() {
        let (ledger, players) = InMemoryLedger::with_players(2);
        let result = join_event(&ledger, players[0], Uuid::new_v4()).await;
        assert!(matches!(result, Err(EventError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let (ledger, players) = InMemoryLedger::with_players(3);
        let host = players[0];
        let event_id = create_event(
            &ledger,
            new_event(host, 2, true),
            vec![players[1], players[2]],
        )
        .await
        .unwrap();
        update_invitation_status(&ledger, players[1], event_id, "accepted")
            .await
            .unwrap();

        let outcome = reconcile(&ledger, event_id).await.unwrap();
        assert_eq!(outcome.closed, 0);
        assert_eq!(outcome.reopened, 0);

        let statuses_before: Vec<_> = ledger.invitations_for(event_id);
        let outcome = reconcile(&ledger, event_id).await.unwrap();
        assert_eq!(outcome.closed, 0);
        assert_eq!(outcome.reopened, 0);
        let statuses_after: Vec<_> = ledger.invitations_for(event_id);
        for (before, after) in statuses_before.iter().zip(statuses_after.iter()) {
            assert_eq!(before.status, after.status);
        }
    }

    #[tokio::test]
    async fn test_unknown_status_string_is_a_validation_error() {
        let (ledger, players) = InMemoryLedger::with_players(2);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 2, true), vec![players[1]])
            .await
            .unwrap();

        for bad in ["maybe", "ACCEPTED", ""] {
            let result = update_invitation_status(&ledger, players[1], event_id, bad).await;
            assert!(matches!(result, Err(EventError::Validation(_))), "{}", bad);
        }
    }

    #[tokio::test]
    async fn test_update_missing_invitation_not_found() {
        let (ledger, players) = InMemoryLedger::with_players(3);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 2, true), vec![players[1]])
            .await
            .unwrap();

        let result = update_invitation_status(&ledger, players[2], event_id, "accepted").await;
        assert!(matches!(result, Err(EventError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_declined_player_may_change_their_mind() {
        let (ledger, players) = InMemoryLedger::with_players(2);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 2, true), vec![players[1]])
            .await
            .unwrap();

        update_invitation_status(&ledger, players[1], event_id, "declined")
            .await
            .unwrap();
        update_invitation_status(&ledger, players[1], event_id, "accepted")
            .await
            .unwrap();

        assert_eq!(
            ledger.status_of(players[1], event_id),
            Some(InviteStatus::Accepted)
        );
    }

    #[tokio::test]
    async fn test_reconcile_failure_surfaces_after_committed_write() {
        let (ledger, players) = InMemoryLedger::with_players(2);
        let host = players[0];
        let event_id = create_event(&ledger, new_event(host, 2, true), vec![players[1]])
            .await
            .unwrap();

        ledger.inject_reconcile_failure();
        let result = update_invitation_status(&ledger, players[1], event_id, "accepted").await;

        assert!(matches!(result, Err(EventError::Storage(_))));
        // The status write itself stays committed; only the cascade is unmet.
        assert_eq!(
            ledger.status_of(players[1], event_id),
            Some(InviteStatus::Accepted)
        );
    }

    #[tokio::test]
    async fn test_capacity_invariant_holds_under_random_sequences() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x7ee71e);
        for _ in 0..20 {
            let (ledger, players) = InMemoryLedger::with_players(6);
            let host = players[0];
            let open_spots = rng.gen_range(1..=4);
            let event_id = create_event(&ledger, new_event(host, open_spots, false), vec![])
                .await
                .unwrap();

            for _ in 0..40 {
                let player = players[rng.gen_range(0..players.len())];
                match rng.gen_range(0..3) {
                    0 => {
                        let _ = update_invitation_status(&ledger, player, event_id, "accepted")
                            .await;
                    }
                    1 => {
                        let _ = update_invitation_status(&ledger, player, event_id, "declined")
                            .await;
                    }
                    _ => {
                        let _ = join_event(&ledger, player, event_id).await;
                    }
                }
                assert_capacity_invariant(&ledger, event_id, open_spots);
            }
        }
    }
}
