//! Player entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Player;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the players table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PlayerEntity> for Player {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            username: entity.username,
            email: entity.email,
            phone: entity.phone,
            created_at: entity.created_at,
        }
    }
}
