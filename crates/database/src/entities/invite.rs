//! Invite entity definitions

use serde::{Deserialize, Serialize};

/// A captain-to-player invitation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInvite {
    pub id: i64,
    pub team_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: InviteStatus,
    pub date_sent: String,
}

/// A pending invite addressed to a user, enriched for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    pub invite_id: i64,
    pub team_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub team_name: String,
    pub inviter_gamer_tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Rejected => "rejected",
        }
    }
}

impl From<&str> for InviteStatus {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => InviteStatus::Accepted,
            "rejected" => InviteStatus::Rejected,
            _ => InviteStatus::Pending,
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
