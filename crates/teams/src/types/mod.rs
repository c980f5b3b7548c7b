//! View types assembled by the services for the gateway to serialize.

use roster_database::entities::{
    PendingInvite, PendingJoinRequest, RosterEntry, Team, TeamInvite, TeamJoinRequest, User,
};
use serde::{Deserialize, Serialize};

/// A team together with everything a captain or member sees about it:
/// the roster plus both pending flows aimed at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedTeam {
    pub team: Team,
    pub members: Vec<RosterEntry>,
    pub invites: Vec<TeamInvite>,
    pub join_requests: Vec<TeamJoinRequest>,
}

/// A user as shown in the invite picker. Deliberately excludes contact
/// details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: i64,
    pub gamer_tag: Option<String>,
}

impl From<User> for PlayerSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            gamer_tag: user.gamer_tag,
        }
    }
}

/// The full account view: the user, their teams, and both pending flows
/// from their side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub user: User,
    pub teams: Vec<GroupedTeam>,
    pub pending_invites: Vec<PendingInvite>,
    pub pending_join_requests: Vec<PendingJoinRequest>,
}
