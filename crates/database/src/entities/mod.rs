//! Entity definitions for the team-membership schema

pub mod invite;
pub mod join_request;
pub mod member;
pub mod team;
pub mod user;

pub use invite::{InviteStatus, PendingInvite, TeamInvite};
pub use join_request::{JoinRequestStatus, PendingJoinRequest, TeamJoinRequest};
pub use member::{RosterEntry, TeamMember};
pub use team::{Team, TeamType};
pub use user::{CreateUserRequest, User};
