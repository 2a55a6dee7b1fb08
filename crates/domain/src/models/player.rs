//! Player domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registered player. Players are the fan-out population for public
/// events and the principals on invitations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a new player.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, message = "Name can't be blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 30, message = "Username must be 1-30 characters"))]
    pub username: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    pub phone: Option<String>,
}

/// Response for a single player.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlayerResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            username: player.username,
            email: player.email,
            phone: player.phone,
        }
    }
}
