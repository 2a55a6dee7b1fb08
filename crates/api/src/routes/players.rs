//! Player routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::player::{CreatePlayerRequest, PlayerResponse};
use domain::models::Player;
use persistence::repositories::PlayerRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Register a new player.
///
/// POST /api/v1/players
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    request.validate()?;

    let repo = PlayerRepository::new(state.pool.clone());
    let entity = repo
        .create_player(
            &request.name,
            &request.username,
            &request.email,
            request.phone.as_deref(),
        )
        .await?;

    info!(player_id = %entity.id, username = %entity.username, "Player created");

    let player: Player = entity.into();
    Ok((StatusCode::CREATED, Json(player.into())))
}

/// List all players.
///
/// GET /api/v1/players
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, ApiError> {
    let repo = PlayerRepository::new(state.pool.clone());
    let players = repo
        .list_players()
        .await?
        .into_iter()
        .map(|entity| Player::from(entity).into())
        .collect();
    Ok(Json(players))
}

/// Fetch one player.
///
/// GET /api/v1/players/:player_id
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let repo = PlayerRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(player_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;
    let player: Player = entity.into();
    Ok(Json(player.into()))
}
