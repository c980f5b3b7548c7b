//! Repository for team registry operations.

use crate::entities::{Team, TeamType};
use crate::types::{TeamError, TeamResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for team database operations
#[derive(Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

fn map_team(row: &sqlx::sqlite::SqliteRow) -> TeamResult<Team> {
    let type_str: String = row
        .try_get("type")
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

    Ok(Team {
        id: row
            .try_get("id")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        captain_id: row
            .try_get("captainId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        team_type: TeamType::from(type_str.as_str()),
    })
}

impl TeamRepository {
    /// Create a new team repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team and its captain membership in one transaction. The
    /// captain row in team_members is what keeps the captain-is-member
    /// invariant true from the first commit onward.
    pub async fn create(
        &self,
        captain_id: i64,
        name: &str,
        team_type: TeamType,
    ) -> TeamResult<Team> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO teams (name, captainId, type) VALUES (?, ?, ?)")
            .bind(name)
            .bind(captain_id)
            .bind(team_type.as_str())
            .execute(&mut *tx)
            .await?;

        let team_id = result.last_insert_rowid();

        sqlx::query("INSERT INTO team_members (teamId, userId) VALUES (?, ?)")
            .bind(team_id)
            .bind(captain_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(team_id, captain_id, name, r#type = %team_type, "created team");

        Ok(Team {
            id: team_id,
            name: name.to_string(),
            captain_id,
            team_type,
        })
    }

    /// Find a team by id
    pub async fn find_by_id(&self, id: i64) -> TeamResult<Option<Team>> {
        let row = sqlx::query("SELECT id, name, captainId, type FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_team).transpose()
    }

    /// Update a team's name and type. Captain-only; the captainId predicate
    /// on the UPDATE keeps the authorization check and the write one atomic
    /// act. Shrinking a squad below its current roster size is refused.
    pub async fn update(
        &self,
        team_id: i64,
        captain_id: i64,
        name: &str,
        team_type: TeamType,
    ) -> TeamResult<Team> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, name, captainId, type FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&mut *tx)
            .await?;

        let team = match row {
            Some(row) => map_team(&row)?,
            None => return Err(TeamError::TeamNotFound),
        };

        if team.captain_id != captain_id {
            return Err(TeamError::NotCaptain);
        }

        let member_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE teamId = ?")
                .bind(team_id)
                .fetch_one(&mut *tx)
                .await?;

        if member_count > team_type.cap() {
            return Err(TeamError::TeamFull);
        }

        sqlx::query("UPDATE teams SET name = ?, type = ? WHERE id = ? AND captainId = ?")
            .bind(name)
            .bind(team_type.as_str())
            .bind(team_id)
            .bind(captain_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(team_id, captain_id, "updated team");

        Ok(Team {
            id: team_id,
            name: name.to_string(),
            captain_id,
            team_type,
        })
    }

    /// All teams where the user is captain or member.
    pub async fn find_for_user(&self, user_id: i64) -> TeamResult<Vec<Team>> {
        let rows = sqlx::query(
            "SELECT DISTINCT t.id, t.name, t.captainId, t.type
             FROM teams t
             LEFT JOIN team_members tm ON t.id = tm.teamId
             WHERE t.captainId = ? OR tm.userId = ?
             ORDER BY t.id",
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_team).collect()
    }

    /// Teams whose name matches the query, excluding teams the user already
    /// captains or belongs to.
    pub async fn search_by_name(&self, query: &str, exclude_user_id: i64) -> TeamResult<Vec<Team>> {
        let search_pattern = format!("%{}%", query);

        let rows = sqlx::query(
            "SELECT id, name, captainId, type FROM teams
             WHERE name LIKE ?
               AND captainId != ?
               AND id NOT IN (SELECT teamId FROM team_members WHERE userId = ?)
             ORDER BY name",
        )
        .bind(search_pattern)
        .bind(exclude_user_id)
        .bind(exclude_user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_team).collect()
    }
}
