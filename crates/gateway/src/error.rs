//! The uniform response envelope and its error half.
//!
//! Every endpoint answers `{ success: true, data?, message? }` or
//! `{ success: false, error: <code | validation detail> }`. Domain and
//! identity errors carry stable codes; only validation failures get
//! structured per-field detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_database::types::TeamError;
use roster_identity::IdentityError;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

/// Success half of the envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    pub fn data_with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        })
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
            message: Some(message.into()),
        })
    }
}

/// Error half of the envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, error: Value) -> Self {
        Self { status, error }
    }

    pub fn code(status: StatusCode, code: &str) -> Self {
        Self::new(status, Value::String(code.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": self.error,
        }));
        (self.status, body).into_response()
    }
}

impl From<TeamError> for ApiError {
    fn from(err: TeamError) -> Self {
        let status = match &err {
            TeamError::TeamNotFound
            | TeamError::MembershipNotFound
            | TeamError::InviteNotFound
            | TeamError::JoinRequestNotFound => StatusCode::NOT_FOUND,
            TeamError::NotCaptain | TeamError::CaptainRemoval => StatusCode::FORBIDDEN,
            TeamError::AlreadyMember
            | TeamError::AlreadyInvited
            | TeamError::AlreadyRequested
            | TeamError::TeamFull => StatusCode::CONFLICT,
            TeamError::Validation(_) => StatusCode::BAD_REQUEST,
            TeamError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match err {
            TeamError::Validation(fields) => Self::new(
                status,
                json!({ "kind": "VALIDATION", "fields": fields }),
            ),
            TeamError::DatabaseError(ref detail) => {
                error!(%detail, "store failure");
                Self::code(status, err.code())
            }
            other => Self::code(status, other.code()),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        let status = match &err {
            IdentityError::Unauthenticated
            | IdentityError::NoEmail
            | IdentityError::NoLocalUser => StatusCode::UNAUTHORIZED,
            IdentityError::Provider(_) | IdentityError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if let IdentityError::Provider(detail) | IdentityError::Database(detail) = &err {
            error!(%detail, "identity failure");
        }

        Self::code(status, err.code())
    }
}
