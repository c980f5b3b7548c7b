//! Team entity definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub captain_id: i64,
    pub team_type: TeamType,
}

/// Size class of a team. The type dictates the membership cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    Duo,
    Squad,
}

impl TeamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamType::Duo => "duo",
            TeamType::Squad => "squad",
        }
    }

    /// Maximum roster size, captain included.
    pub fn cap(&self) -> i64 {
        match self {
            TeamType::Duo => 2,
            TeamType::Squad => 4,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "duo" => Some(TeamType::Duo),
            "squad" => Some(TeamType::Squad),
            _ => None,
        }
    }
}

impl From<&str> for TeamType {
    fn from(s: &str) -> Self {
        TeamType::parse(s).unwrap_or(TeamType::Squad)
    }
}

impl std::fmt::Display for TeamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
