//! User entity definitions

use serde::{Deserialize, Serialize};

/// A local user row. The external principal id lives with the identity
/// provider; resolution happens by primary email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    pub gamer_tag: Option<String>,
}

/// Payload used by the onboarding collaborator to create the local row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub phone: Option<String>,
    pub gamer_tag: Option<String>,
}
