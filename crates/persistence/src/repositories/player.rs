//! Player repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::PlayerEntity;
use crate::metrics::QueryTimer;

/// Repository for player-related database operations.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: PgPool,
}

impl PlayerRepository {
    /// Creates a new PlayerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new player.
    pub async fn create_player(
        &self,
        name: &str,
        username: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<PlayerEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_player");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            INSERT INTO players (name, username, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, username, email, phone, created_at
            "#,
        )
        .bind(name)
        .bind(username)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a player by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_player_by_id");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, name, username, email, phone, created_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all players.
    pub async fn list_players(&self) -> Result<Vec<PlayerEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_players");
        let result = sqlx::query_as::<_, PlayerEntity>(
            r#"
            SELECT id, name, username, email, phone, created_at
            FROM players
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
