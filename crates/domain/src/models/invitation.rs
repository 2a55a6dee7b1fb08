//! Invitation domain models and the status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an invitation.
///
/// `Pending` and `Closed` are interchanged automatically by the capacity
/// reconciler; `Accepted` and `Declined` change only by participant action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Closed,
}

impl InviteStatus {
    /// Parse a symbolic status name. Returns `None` for anything that is not
    /// one of `pending`, `accepted`, `declined`, `closed`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents one player's invitation to one event.
///
/// Exactly one invitation exists per (player, event) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub player_id: Uuid,
    pub event_id: Uuid,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update an invitation's status.
///
/// The status crosses the boundary as a symbolic name; anything
/// unrecognized is rejected by the service with a validation error.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateInvitationRequest {
    pub player_id: Uuid,
    pub event_id: Uuid,
    #[validate(length(min = 1, message = "Status can't be blank"))]
    pub status: String,
}

/// Request to join an event directly, without a prior invitation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinEventRequest {
    pub player_id: Uuid,
    pub event_id: Uuid,
}

/// Response for a single invitation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationResponse {
    pub id: Uuid,
    pub player_id: Uuid,
    pub event_id: Uuid,
    pub status: InviteStatus,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        Self {
            id: invitation.id,
            player_id: invitation.player_id,
            event_id: invitation.event_id,
            status: invitation.status,
        }
    }
}
