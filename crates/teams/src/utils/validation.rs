//! Input validation for the team endpoints.

use roster_database::entities::TeamType;
use roster_database::types::{FieldError, TeamError, TeamResult};

pub const MIN_TEAM_NAME_LEN: usize = 3;

/// Validate the raw team name and type from a create/update payload.
/// Collects all field problems rather than stopping at the first.
pub fn validate_team_input(name: &str, team_type: &str) -> TeamResult<(String, TeamType)> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.chars().count() < MIN_TEAM_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Team name must be at least {} characters", MIN_TEAM_NAME_LEN),
        ));
    }

    let parsed = TeamType::parse(team_type);
    if parsed.is_none() {
        errors.push(FieldError::new("type", "Team type must be 'duo' or 'squad'"));
    }

    match parsed {
        Some(team_type) if errors.is_empty() => Ok((name.to_string(), team_type)),
        _ => Err(TeamError::Validation(errors)),
    }
}

/// Search queries must carry at least one non-whitespace character.
pub fn validate_search_query(query: &str) -> TeamResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(TeamError::Validation(vec![FieldError::new(
            "q",
            "Search query must not be blank",
        )]));
    }
    Ok(trimmed)
}
