//! HTTP gateway for the roster backend.

#[cfg(debug_assertions)]
mod docs;
mod error;
mod state;

pub mod rest;

pub use error::{ApiError, ApiResponse};
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/api/health", get(rest::health::health_check))
        // Team registry
        .route("/api/teams", post(rest::teams::create_team))
        .route("/api/teams/mine", get(rest::teams::my_teams))
        .route("/api/teams/search", get(rest::teams::search_teams))
        .route("/api/teams/:team_id", put(rest::teams::update_team))
        .route(
            "/api/teams/:team_id/members/:member_id",
            delete(rest::teams::remove_member),
        )
        // Invite flow
        .route(
            "/api/teams/:team_id/invites",
            post(rest::invites::create_invite),
        )
        .route(
            "/api/teams/:team_id/invites/:invitee_id",
            delete(rest::invites::cancel_invite),
        )
        .route(
            "/api/teams/:team_id/invites/accept",
            post(rest::invites::accept_invite),
        )
        .route(
            "/api/teams/:team_id/invites/reject",
            post(rest::invites::reject_invite),
        )
        .route("/api/invites/mine", get(rest::invites::my_invites))
        // Join-request flow
        .route(
            "/api/teams/:team_id/join-requests",
            post(rest::join_requests::create_join_request)
                .delete(rest::join_requests::cancel_join_request),
        )
        .route(
            "/api/teams/:team_id/join-requests/:requester_id/accept",
            post(rest::join_requests::accept_join_request),
        )
        .route(
            "/api/teams/:team_id/join-requests/:requester_id/reject",
            post(rest::join_requests::reject_join_request),
        )
        .route(
            "/api/join-requests/mine",
            get(rest::join_requests::my_join_requests),
        )
        // Users
        .route("/api/users/me", get(rest::users::get_current_user))
        .route("/api/users/search", get(rest::users::search_users));

    let router = mount_docs(router);

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

#[cfg(debug_assertions)]
fn mount_docs(router: Router<AppState>) -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
}

#[cfg(not(debug_assertions))]
fn mount_docs(router: Router<AppState>) -> Router<AppState> {
    router
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([AUTHORIZATION, CONTENT_TYPE])
}
