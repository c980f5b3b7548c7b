//! Repository for team roster membership.

use crate::entities::RosterEntry;
use crate::types::{TeamError, TeamResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for team_members rows
#[derive(Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether the user currently sits on the team's roster.
    pub async fn is_member(&self, team_id: i64, user_id: i64) -> TeamResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE teamId = ? AND userId = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Current roster size of the team.
    pub async fn count_for_team(&self, team_id: i64) -> TeamResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE teamId = ?")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Roster entries for a batch of teams, joined against users for the
    /// display tag. Returns an empty vector for an empty batch without
    /// touching the store.
    pub async fn list_for_teams(&self, team_ids: &[i64]) -> TeamResult<Vec<RosterEntry>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = team_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT tm.teamId, tm.userId, u.gamerTag
             FROM team_members tm
             JOIN users u ON u.id = tm.userId
             WHERE tm.teamId IN ({})
             ORDER BY tm.teamId, tm.userId",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for team_id in team_ids {
            query = query.bind(team_id);
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(RosterEntry {
                    team_id: row
                        .try_get("teamId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    user_id: row
                        .try_get("userId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    gamer_tag: row
                        .try_get("gamerTag")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Remove a member from the team. Captain-only, and the captain's own
    /// row is untouchable; the team would otherwise be left ownerless.
    pub async fn remove(&self, team_id: i64, captain_id: i64, member_id: i64) -> TeamResult<()> {
        let mut tx = self.pool.begin().await?;

        let team_captain: Option<i64> =
            sqlx::query_scalar("SELECT captainId FROM teams WHERE id = ?")
                .bind(team_id)
                .fetch_optional(&mut *tx)
                .await?;

        let team_captain = team_captain.ok_or(TeamError::TeamNotFound)?;

        if team_captain != captain_id {
            return Err(TeamError::NotCaptain);
        }

        if member_id == team_captain {
            return Err(TeamError::CaptainRemoval);
        }

        let result = sqlx::query("DELETE FROM team_members WHERE teamId = ? AND userId = ?")
            .bind(team_id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::MembershipNotFound);
        }

        tx.commit().await?;

        info!(team_id, member_id, "removed team member");
        Ok(())
    }
}
