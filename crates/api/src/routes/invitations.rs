//! Invitation routes: the two status-transition entry points.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::invitation::{
    InvitationResponse, JoinEventRequest, UpdateInvitationRequest,
};
use domain::services::events as lifecycle;
use persistence::repositories::EventRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Update one invitation's status and reconcile the event's capacity.
///
/// PATCH /api/v1/invitations
pub async fn update_invitation(
    State(state): State<AppState>,
    Json(request): Json<UpdateInvitationRequest>,
) -> Result<Json<InvitationResponse>, ApiError> {
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());

    let invitation = lifecycle::update_invitation_status(
        &repo,
        request.player_id,
        request.event_id,
        &request.status,
    )
    .await?;

    info!(
        player_id = %invitation.player_id,
        event_id = %invitation.event_id,
        status = %invitation.status,
        "Invitation status updated"
    );
    Ok(Json(invitation.into()))
}

/// Self-enroll in an event without a prior invitation.
///
/// POST /api/v1/invitations/join
pub async fn join_event(
    State(state): State<AppState>,
    Json(request): Json<JoinEventRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    let repo = EventRepository::new(state.pool.clone());

    let invitation = lifecycle::join_event(&repo, request.player_id, request.event_id).await?;

    Ok((StatusCode::CREATED, Json(invitation.into())))
}
