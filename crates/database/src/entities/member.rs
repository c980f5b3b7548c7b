//! Membership entity definitions

use serde::{Deserialize, Serialize};

/// A (team, user) membership row. The pair is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
}

/// A membership row enriched with the member's display handle, as surfaced
/// in the grouped team view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub team_id: i64,
    pub user_id: i64,
    pub gamer_tag: Option<String>,
}
