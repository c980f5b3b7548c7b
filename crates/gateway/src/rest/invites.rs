//! Invite flow endpoints. Sending and cancelling are captain acts; accepting
//! and rejecting belong to the invitee.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use roster_database::entities::{PendingInvite, TeamInvite};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    pub invitee_id: i64,
}

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/invites",
    tag = "Invites",
    request_body = InvitePayload,
    responses(
        (status = 200, description = "Invite sent"),
        (status = 403, description = "Caller is not the captain"),
        (status = 409, description = "Already a member, already in a pending flow, or team full")
    )
)]
pub async fn create_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
    Json(payload): Json<InvitePayload>,
) -> Result<Json<ApiResponse<TeamInvite>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let invite = state
        .invites()
        .send(team_id, user.id, payload.invitee_id)
        .await?;

    Ok(ApiResponse::data_with_message(
        invite,
        "Invite sent successfully.",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/teams/{team_id}/invites/{invitee_id}",
    tag = "Invites",
    responses(
        (status = 200, description = "Pending invite withdrawn"),
        (status = 403, description = "Caller is not the captain"),
        (status = 404, description = "No pending invite for this pair")
    )
)]
pub async fn cancel_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((team_id, invitee_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state.invites().cancel(team_id, user.id, invitee_id).await?;

    Ok(ApiResponse::message("Invite cancelled successfully"))
}

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/invites/accept",
    tag = "Invites",
    responses(
        (status = 200, description = "Caller joined the team"),
        (status = 404, description = "No pending invite addressed to the caller"),
        (status = 409, description = "Team filled up in the meantime")
    )
)]
pub async fn accept_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state.invites().accept(team_id, user.id).await?;

    Ok(ApiResponse::message("Invite accepted successfully."))
}

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/invites/reject",
    tag = "Invites",
    responses(
        (status = 200, description = "Invite rejected"),
        (status = 404, description = "No pending invite addressed to the caller")
    )
)]
pub async fn reject_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state.invites().reject(team_id, user.id).await?;

    Ok(ApiResponse::message("Invite rejected successfully."))
}

#[utoipa::path(
    get,
    path = "/api/invites/mine",
    tag = "Invites",
    responses((status = 200, description = "Pending invites addressed to the caller"))
)]
pub async fn my_invites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<PendingInvite>>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let invites = state.invites().pending_for(user.id).await?;

    Ok(ApiResponse::data(invites))
}
