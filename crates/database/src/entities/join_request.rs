//! Join-request entity definitions

use serde::{Deserialize, Serialize};

/// A player-to-captain join request row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamJoinRequest {
    pub id: i64,
    pub team_id: i64,
    pub requester_id: i64,
    pub status: JoinRequestStatus,
    pub date_requested: String,
}

/// A pending join request made by a user, enriched for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingJoinRequest {
    pub request_id: i64,
    pub team_id: i64,
    pub requester_id: i64,
    pub team_name: String,
    pub date_requested: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl JoinRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinRequestStatus::Pending => "pending",
            JoinRequestStatus::Accepted => "accepted",
            JoinRequestStatus::Rejected => "rejected",
        }
    }
}

impl From<&str> for JoinRequestStatus {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => JoinRequestStatus::Accepted,
            "rejected" => JoinRequestStatus::Rejected,
            _ => JoinRequestStatus::Pending,
        }
    }
}

impl std::fmt::Display for JoinRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
