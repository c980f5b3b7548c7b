//! Error types for the persistence layer

use thiserror::Error;

/// A single field that failed input validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Team-membership domain errors. Every operation in the registry and both
/// flow engines surfaces one of these; the gateway maps them onto the stable
/// wire codes.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("Team not found")]
    TeamNotFound,

    #[error("Membership not found")]
    MembershipNotFound,

    #[error("Invite not found or already accepted/rejected")]
    InviteNotFound,

    #[error("Join request not found or already accepted/rejected")]
    JoinRequestNotFound,

    #[error("You are not the captain of this team")]
    NotCaptain,

    #[error("The captain cannot be removed from the team")]
    CaptainRemoval,

    #[error("You are already a member of this team")]
    AlreadyMember,

    #[error("Invite already exists")]
    AlreadyInvited,

    #[error("Join request already exists")]
    AlreadyRequested,

    #[error("Team is already at full capacity")]
    TeamFull,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl TeamError {
    /// Stable code surfaced to callers in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            TeamError::TeamNotFound
            | TeamError::MembershipNotFound
            | TeamError::InviteNotFound
            | TeamError::JoinRequestNotFound => "NOT_FOUND",
            TeamError::NotCaptain | TeamError::CaptainRemoval => "FORBIDDEN",
            TeamError::AlreadyMember => "ALREADY_MEMBER",
            TeamError::AlreadyInvited => "ALREADY_INVITED",
            TeamError::AlreadyRequested => "ALREADY_REQUESTED",
            TeamError::TeamFull => "TEAM_FULL",
            TeamError::Validation(_) => "VALIDATION",
            TeamError::DatabaseError(_) => "INTERNAL",
        }
    }

    /// Whether the underlying store rejected the statement because the
    /// database was busy or locked. Only these are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            TeamError::DatabaseError(message) => {
                message.contains("database is locked") || message.contains("database is busy")
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for TeamError {
    fn from(error: sqlx::Error) -> Self {
        TeamError::DatabaseError(error.to_string())
    }
}

/// User-specific database errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for UserError {
    fn from(error: sqlx::Error) -> Self {
        UserError::DatabaseError(error.to_string())
    }
}
