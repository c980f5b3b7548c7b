//! Team-membership domain services.
//!
//! Sits between the HTTP gateway and the repositories: input validation,
//! bounded retries for a busy store, account-view revalidation fan-out, and
//! assembly of the grouped team views.

pub mod services;
pub mod types;
pub mod utils;

pub use services::invite_service::InviteService;
pub use services::join_request_service::JoinRequestService;
pub use services::revalidation::{RevalidationEvent, RevalidationHandle};
pub use services::team_service::TeamService;
pub use types::{GroupedTeam, PlayerSummary, UserDetails};
