//! Join-request flow endpoints. Filing and withdrawing are requester acts;
//! the captain decides.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use roster_database::entities::{PendingJoinRequest, TeamJoinRequest};

use crate::{ApiError, ApiResponse, AppState};

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/join-requests",
    tag = "Join requests",
    responses(
        (status = 200, description = "Join request filed"),
        (status = 404, description = "No such team"),
        (status = 409, description = "Already a member or already in a pending flow")
    )
)]
pub async fn create_join_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
) -> Result<Json<ApiResponse<TeamJoinRequest>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let request = state.join_requests().send(team_id, user.id).await?;

    Ok(ApiResponse::data_with_message(
        request,
        "Join request sent successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/teams/{team_id}/join-requests",
    tag = "Join requests",
    responses(
        (status = 200, description = "Pending request withdrawn"),
        (status = 404, description = "No pending request by the caller")
    )
)]
pub async fn cancel_join_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state.join_requests().cancel(team_id, user.id).await?;

    Ok(ApiResponse::message("Join request canceled successfully."))
}

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/join-requests/{requester_id}/accept",
    tag = "Join requests",
    responses(
        (status = 200, description = "Requester joined the team"),
        (status = 403, description = "Caller is not the captain"),
        (status = 404, description = "No pending request for this pair"),
        (status = 409, description = "Team full")
    )
)]
pub async fn accept_join_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((team_id, requester_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state
        .join_requests()
        .accept(team_id, user.id, requester_id)
        .await?;

    Ok(ApiResponse::message("Join request accepted successfully."))
}

#[utoipa::path(
    post,
    path = "/api/teams/{team_id}/join-requests/{requester_id}/reject",
    tag = "Join requests",
    responses(
        (status = 200, description = "Request rejected"),
        (status = 403, description = "Caller is not the captain"),
        (status = 404, description = "No pending request for this pair")
    )
)]
pub async fn reject_join_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((team_id, requester_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state
        .join_requests()
        .reject(team_id, user.id, requester_id)
        .await?;

    Ok(ApiResponse::message("Join request rejected successfully."))
}

#[utoipa::path(
    get,
    path = "/api/join-requests/mine",
    tag = "Join requests",
    responses((status = 200, description = "Pending requests filed by the caller"))
)]
pub async fn my_join_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<PendingJoinRequest>>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let requests = state.join_requests().pending_for(user.id).await?;

    Ok(ApiResponse::data(requests))
}
