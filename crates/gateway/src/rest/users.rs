//! User-facing endpoints: the account view and the invite picker search.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use roster_teams::{PlayerSummary, UserDetails};
use serde::Deserialize;

use crate::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's account view"),
        (status = 401, description = "Unresolved principal")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<UserDetails>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let details = state.teams().user_details(&user).await?;

    Ok(ApiResponse::data(details))
}

#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(("q" = String, Query, description = "Gamer tag fragment")),
    responses(
        (status = 200, description = "Players matching the query, caller excluded"),
        (status = 400, description = "Blank query")
    )
)]
pub async fn search_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<Vec<PlayerSummary>>>, ApiError> {
    let user = state.current_user(&headers).await?;
    let players = state.teams().search_players(&params.q, user.id).await?;

    Ok(ApiResponse::data(players))
}
