//! Team registry endpoints.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use roster_database::entities::Team;
use roster_teams::GroupedTeam;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub team_type: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "Teams",
    request_body = TeamPayload,
    responses(
        (status = 200, description = "Team created, caller is captain"),
        (status = 400, description = "Invalid name or type"),
        (status = 401, description = "Unresolved principal")
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let team = state
        .teams()
        .create_team(user.id, &payload.name, &payload.team_type)
        .await?;

    Ok(ApiResponse::data_with_message(team, "Team created."))
}

#[utoipa::path(
    put,
    path = "/api/teams/{team_id}",
    tag = "Teams",
    request_body = TeamPayload,
    responses(
        (status = 200, description = "Team updated"),
        (status = 403, description = "Caller is not the captain"),
        (status = 404, description = "No such team"),
        (status = 409, description = "Shrinking below current roster size")
    )
)]
pub async fn update_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(team_id): Path<i64>,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<ApiResponse<Team>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let team = state
        .teams()
        .update_team(team_id, user.id, &payload.name, &payload.team_type)
        .await?;

    Ok(ApiResponse::data_with_message(
        team,
        "Team updated successfully.",
    ))
}

#[utoipa::path(
    get,
    path = "/api/teams/mine",
    tag = "Teams",
    responses((status = 200, description = "Caller's teams with rosters and pending flows"))
)]
pub async fn my_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Vec<GroupedTeam>>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let grouped = state.teams().teams_for_user(user.id).await?;

    Ok(ApiResponse::data(grouped))
}

#[utoipa::path(
    get,
    path = "/api/teams/search",
    tag = "Teams",
    params(("q" = String, Query, description = "Team name fragment")),
    responses(
        (status = 200, description = "Joinable teams matching the query"),
        (status = 400, description = "Blank query")
    )
)]
pub async fn search_teams(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<Team>>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let teams = state.teams().search_teams(&params.q, user.id).await?;

    Ok(ApiResponse::data(teams))
}

#[utoipa::path(
    delete,
    path = "/api/teams/{team_id}/members/{member_id}",
    tag = "Teams",
    responses(
        (status = 200, description = "Member removed"),
        (status = 403, description = "Caller is not the captain, or target is the captain"),
        (status = 404, description = "No such team or membership")
    )
)]
pub async fn remove_member(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((team_id, member_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let user = state.current_user(&headers).await?;
    state
        .teams()
        .remove_member(team_id, user.id, member_id)
        .await?;

    Ok(ApiResponse::message("Team member removed from team"))
}
