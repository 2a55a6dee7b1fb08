//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{InviteStatus, Invitation};
use sqlx::FromRow;
use uuid::Uuid;

/// Database representation of an invitation status.
///
/// The ledger stores small integer codes; the symbolic enum exists only
/// above this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[repr(i16)]
pub enum InviteStatusDb {
    Pending = 0,
    Accepted = 1,
    Declined = 2,
    Closed = 3,
}

impl From<InviteStatusDb> for InviteStatus {
    fn from(db_status: InviteStatusDb) -> Self {
        match db_status {
            InviteStatusDb::Pending => InviteStatus::Pending,
            InviteStatusDb::Accepted => InviteStatus::Accepted,
            InviteStatusDb::Declined => InviteStatus::Declined,
            InviteStatusDb::Closed => InviteStatus::Closed,
        }
    }
}

impl From<InviteStatus> for InviteStatusDb {
    fn from(status: InviteStatus) -> Self {
        match status {
            InviteStatus::Pending => InviteStatusDb::Pending,
            InviteStatus::Accepted => InviteStatusDb::Accepted,
            InviteStatus::Declined => InviteStatusDb::Declined,
            InviteStatus::Closed => InviteStatusDb::Closed,
        }
    }
}

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub player_id: Uuid,
    pub event_id: Uuid,
    pub status: InviteStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationEntity> for Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            player_id: entity.player_id,
            event_id: entity.event_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
