//! Repository for the player-to-captain join-request flow.

use crate::entities::{JoinRequestStatus, PendingJoinRequest, TeamJoinRequest, TeamType};
use crate::types::{TeamError, TeamResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for team_join_requests rows
#[derive(Clone)]
pub struct JoinRequestRepository {
    pool: SqlitePool,
}

fn map_join_request(row: &sqlx::sqlite::SqliteRow) -> TeamResult<TeamJoinRequest> {
    let status: String = row
        .try_get("status")
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

    Ok(TeamJoinRequest {
        id: row
            .try_get("id")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        team_id: row
            .try_get("teamId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        requester_id: row
            .try_get("requesterId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        status: JoinRequestStatus::from(status.as_str()),
        date_requested: row
            .try_get("dateRequested")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
    })
}

impl JoinRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// File a join request against a team. The requester must not already be
    /// on the roster and must not have an earlier request row for this team,
    /// whatever its status.
    pub async fn create(&self, team_id: i64, requester_id: i64) -> TeamResult<TeamJoinRequest> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(TeamError::TeamNotFound);
        }

        let member_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE teamId = ? AND userId = ?",
        )
        .bind(team_id)
        .bind(requester_id)
        .fetch_one(&mut *tx)
        .await?;

        if member_count > 0 {
            return Err(TeamError::AlreadyMember);
        }

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_join_requests WHERE teamId = ? AND requesterId = ?",
        )
        .bind(team_id)
        .bind(requester_id)
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            return Err(TeamError::AlreadyRequested);
        }

        // A user the captain has already invited should answer that invite
        // rather than open a second pending flow.
        let invited: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_invite_requests
             WHERE teamId = ? AND inviteeId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(requester_id)
        .fetch_one(&mut *tx)
        .await?;

        if invited > 0 {
            return Err(TeamError::AlreadyInvited);
        }

        let date_requested = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO team_join_requests (teamId, requesterId, status, dateRequested)
             VALUES (?, ?, 'pending', ?)",
        )
        .bind(team_id)
        .bind(requester_id)
        .bind(&date_requested)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                TeamError::AlreadyRequested
            } else {
                TeamError::DatabaseError(e.to_string())
            }
        })?;

        tx.commit().await?;

        let request_id = result.last_insert_rowid();
        info!(request_id, team_id, requester_id, "sent join request");

        Ok(TeamJoinRequest {
            id: request_id,
            team_id,
            requester_id,
            status: JoinRequestStatus::Pending,
            date_requested,
        })
    }

    /// Withdraw a pending join request. Requester-only; deleting the row
    /// means the user can ask again later.
    pub async fn cancel(&self, team_id: i64, requester_id: i64) -> TeamResult<()> {
        let result = sqlx::query(
            "DELETE FROM team_join_requests
             WHERE teamId = ? AND requesterId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(requester_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::JoinRequestNotFound);
        }

        info!(team_id, requester_id, "cancelled join request");
        Ok(())
    }

    /// Accept a join request as the captain. Status flip and membership
    /// insert commit together; the 'pending' predicate makes a second accept
    /// lose cleanly.
    pub async fn accept(
        &self,
        team_id: i64,
        captain_id: i64,
        requester_id: i64,
    ) -> TeamResult<()> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT t.captainId, t.type AS teamType,
                    (SELECT COUNT(*) FROM team_members tm WHERE tm.teamId = t.id) AS memberCount
             FROM teams t WHERE t.id = ?",
        )
        .bind(team_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(TeamError::TeamNotFound)?;

        let team_captain: i64 = row
            .try_get("captainId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?;
        if team_captain != captain_id {
            return Err(TeamError::NotCaptain);
        }

        let team_type: String = row
            .try_get("teamType")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?;
        let member_count: i64 = row
            .try_get("memberCount")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

        if member_count >= TeamType::from(team_type.as_str()).cap() {
            return Err(TeamError::TeamFull);
        }

        let result = sqlx::query(
            "UPDATE team_join_requests SET status = 'accepted'
             WHERE teamId = ? AND requesterId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(requester_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::JoinRequestNotFound);
        }

        sqlx::query("INSERT INTO team_members (teamId, userId) VALUES (?, ?)")
            .bind(team_id)
            .bind(requester_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    TeamError::AlreadyMember
                } else {
                    TeamError::DatabaseError(e.to_string())
                }
            })?;

        tx.commit().await?;

        info!(team_id, requester_id, "accepted join request");
        Ok(())
    }

    /// Reject a join request as the captain. The row stays behind as
    /// 'rejected', which blocks a repeat request for this team and user.
    pub async fn reject(
        &self,
        team_id: i64,
        captain_id: i64,
        requester_id: i64,
    ) -> TeamResult<()> {
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

        let result = sqlx::query(
            "UPDATE team_join_requests SET status = 'rejected'
             WHERE teamId = ? AND requesterId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(requester_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::JoinRequestNotFound);
        }

        tx.commit().await?;

        info!(team_id, requester_id, "rejected join request");
        Ok(())
    }

    /// Pending requests the user has filed, enriched with the team name.
    pub async fn list_pending_for_requester(
        &self,
        user_id: i64,
    ) -> TeamResult<Vec<PendingJoinRequest>> {
        let rows = sqlx::query(
            "SELECT r.id, r.teamId, r.requesterId, r.dateRequested, t.name AS teamName
             FROM team_join_requests r
             JOIN teams t ON t.id = r.teamId
             WHERE r.requesterId = ? AND r.status = 'pending'
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PendingJoinRequest {
                    request_id: row
                        .try_get("id")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    team_id: row
                        .try_get("teamId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    requester_id: row
                        .try_get("requesterId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    team_name: row
                        .try_get("teamName")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    date_requested: row
                        .try_get("dateRequested")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Pending requests aimed at a batch of teams, for the grouped view.
    pub async fn list_pending_for_teams(
        &self,
        team_ids: &[i64],
    ) -> TeamResult<Vec<TeamJoinRequest>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = team_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT id, teamId, requesterId, status, dateRequested
             FROM team_join_requests
             WHERE teamId IN ({}) AND status = 'pending'
             ORDER BY teamId, id",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for team_id in team_ids {
            query = query.bind(team_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_join_request).collect()
    }
}
