//! Shared types for the persistence layer

pub mod errors;

pub use errors::{FieldError, TeamError, UserError};

pub type TeamResult<T> = Result<T, TeamError>;
pub type UserResult<T> = Result<T, UserError>;
