use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::rest::health::health_check,
        crate::rest::teams::create_team,
        crate::rest::teams::update_team,
        crate::rest::teams::my_teams,
        crate::rest::teams::search_teams,
        crate::rest::teams::remove_member,
        crate::rest::invites::create_invite,
        crate::rest::invites::cancel_invite,
        crate::rest::invites::accept_invite,
        crate::rest::invites::reject_invite,
        crate::rest::invites::my_invites,
        crate::rest::join_requests::create_join_request,
        crate::rest::join_requests::cancel_join_request,
        crate::rest::join_requests::accept_join_request,
        crate::rest::join_requests::reject_join_request,
        crate::rest::join_requests::my_join_requests,
        crate::rest::users::get_current_user,
        crate::rest::users::search_users
    ),
    components(schemas(
        crate::rest::teams::TeamPayload,
        crate::rest::invites::InvitePayload
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Teams", description = "Team registry"),
        (name = "Invites", description = "Captain-to-player invitations"),
        (name = "Join requests", description = "Player-to-captain join requests"),
        (name = "Users", description = "Account view and player search")
    )
)]
pub struct ApiDoc;
