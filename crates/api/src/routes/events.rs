//! Event routes: creation with invitee fan-out, read views, deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::event::{CreateEventRequest, EventResponse};
use domain::models::InviteStatus;
use domain::services::capacity;
use domain::services::events as lifecycle;
use persistence::repositories::EventRepository;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for listing events.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// `private=false` restricts the listing to public events.
    pub private: Option<bool>,
    /// Restricts the listing to events the player holds an invitation for.
    pub player_id: Option<Uuid>,
}

/// Create a new event with its invitee fan-out.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let (event, invitees) = request
        .into_parts()
        .ok_or_else(|| ApiError::Validation("Invalid event payload".to_string()))?;
    let event_id = lifecycle::create_event(&repo, event, invitees).await?;

    let response = build_event_response(&repo, event_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Created event is not readable".to_string()))?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List events, optionally filtered to public ones or to a player.
///
/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());

    let event_ids = if let Some(player_id) = query.player_id {
        repo.list_event_ids_by_player(player_id).await?
    } else if query.private == Some(false) {
        repo.list_public_event_ids().await?
    } else {
        repo.list_event_ids().await?
    };

    let mut responses = Vec::with_capacity(event_ids.len());
    for event_id in event_ids {
        if let Some(response) = build_event_response(&repo, event_id).await? {
            responses.push(response);
        }
    }
    Ok(Json(responses))
}

/// Events a player holds any invitation for.
///
/// GET /api/v1/players/:player_id/events
pub async fn list_events_for_player(
    State(state): State<AppState>,
    Path(player_id): Path<Uuid>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());

    let mut responses = Vec::new();
    for event_id in repo.list_event_ids_by_player(player_id).await? {
        if let Some(response) = build_event_response(&repo, event_id).await? {
            responses.push(response);
        }
    }
    Ok(Json(responses))
}

/// Full read view of one event.
///
/// GET /api/v1/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let response = build_event_response(&repo, event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
    Ok(Json(response))
}

/// Delete an event; its invitations are cascaded away with it.
///
/// DELETE /api/v1/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let deleted = repo.delete_event(event_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    info!(event_id = %event_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Assemble the event view: joined names, per-status participant lists, and
/// the remaining capacity recomputed from the current accepted count.
pub async fn build_event_response(
    repo: &EventRepository,
    event_id: Uuid,
) -> Result<Option<EventResponse>, ApiError> {
    let Some(detail) = repo.find_detail(event_id).await? else {
        return Ok(None);
    };

    let accepted = repo
        .list_player_ids_by_status(event_id, InviteStatus::Accepted)
        .await?;
    let declined = repo
        .list_player_ids_by_status(event_id, InviteStatus::Declined)
        .await?;
    let pending = repo
        .list_player_ids_by_status(event_id, InviteStatus::Pending)
        .await?;
    let closed = repo
        .list_player_ids_by_status(event_id, InviteStatus::Closed)
        .await?;

    let remaining_spots = capacity::remaining_spots(detail.open_spots, accepted.len() as i64);

    Ok(Some(EventResponse {
        id: detail.id,
        course_id: detail.course_id,
        course_name: detail.course_name,
        date: detail.date,
        tee_time: detail.tee_time,
        open_spots: detail.open_spots,
        number_of_holes: detail.number_of_holes,
        private: detail.private,
        host_id: detail.host_id,
        host_name: detail.host_name,
        accepted,
        declined,
        pending,
        closed,
        remaining_spots,
    }))
}
