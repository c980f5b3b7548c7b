//! Repository for the captain-to-player invite flow.

use crate::entities::{InviteStatus, PendingInvite, TeamInvite};
use crate::types::{TeamError, TeamResult};
use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::info;

/// Repository for team_invite_requests rows
#[derive(Clone)]
pub struct InviteRepository {
    pool: SqlitePool,
}

fn map_invite(row: &sqlx::sqlite::SqliteRow) -> TeamResult<TeamInvite> {
    let status: String = row
        .try_get("status")
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

    Ok(TeamInvite {
        id: row
            .try_get("id")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        team_id: row
            .try_get("teamId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        inviter_id: row
            .try_get("inviterId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        invitee_id: row
            .try_get("inviteeId")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
        status: InviteStatus::from(status.as_str()),
        date_sent: row
            .try_get("dateSent")
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
    })
}

async fn team_capacity(tx: &mut Transaction<'_, Sqlite>, team_id: i64) -> TeamResult<(i64, i64)> {
    let row = sqlx::query(
        "SELECT t.type AS teamType,
                (SELECT COUNT(*) FROM team_members tm WHERE tm.teamId = t.id) AS memberCount
         FROM teams t WHERE t.id = ?",
    )
    .bind(team_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(TeamError::TeamNotFound)?;

    let team_type: String = row
        .try_get("teamType")
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;
    let count: i64 = row
        .try_get("memberCount")
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

    let cap = crate::entities::TeamType::from(team_type.as_str()).cap();
    Ok((count, cap))
}

impl InviteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Send an invite. Captain-only; the invitee must not already sit on the
    /// roster, must not have been invited before (any status, the pair index
    /// enforces one row per team and invitee for good), and the team must
    /// still have a free slot.
    pub async fn create(
        &self,
        team_id: i64,
        captain_id: i64,
        invitee_id: i64,
    ) -> TeamResult<TeamInvite> {
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

        let member_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE teamId = ? AND userId = ?",
        )
        .bind(team_id)
        .bind(invitee_id)
        .fetch_one(&mut *tx)
        .await?;

        if member_count > 0 {
            return Err(TeamError::AlreadyMember);
        }

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_invite_requests WHERE teamId = ? AND inviteeId = ?",
        )
        .bind(team_id)
        .bind(invitee_id)
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            return Err(TeamError::AlreadyInvited);
        }

        // A user with a pending join request for this team is already in one
        // flow; the captain should decide that request instead.
        let requested: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_join_requests
             WHERE teamId = ? AND requesterId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(invitee_id)
        .fetch_one(&mut *tx)
        .await?;

        if requested > 0 {
            return Err(TeamError::AlreadyRequested);
        }

        let (count, cap) = team_capacity(&mut tx, team_id).await?;
        if count >= cap {
            return Err(TeamError::TeamFull);
        }

        let date_sent = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO team_invite_requests (teamId, inviterId, inviteeId, status, dateSent)
             VALUES (?, ?, ?, 'pending', ?)",
        )
        .bind(team_id)
        .bind(captain_id)
        .bind(invitee_id)
        .bind(&date_sent)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                TeamError::AlreadyInvited
            } else {
                TeamError::DatabaseError(e.to_string())
            }
        })?;

        tx.commit().await?;

        let invite_id = result.last_insert_rowid();
        info!(invite_id, team_id, invitee_id, "sent team invite");

        Ok(TeamInvite {
            id: invite_id,
            team_id,
            inviter_id: captain_id,
            invitee_id,
            status: InviteStatus::Pending,
            date_sent,
        })
    }

    /// Cancel a pending invite. Captain-only; the row is deleted outright so
    /// the invitee can be invited again later.
    pub async fn cancel(&self, team_id: i64, captain_id: i64, invitee_id: i64) -> TeamResult<()> {
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
            "DELETE FROM team_invite_requests
             WHERE teamId = ? AND inviteeId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(invitee_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::InviteNotFound);
        }

        tx.commit().await?;

        info!(team_id, invitee_id, "cancelled team invite");
        Ok(())
    }

    /// Accept an invite as the invitee. The status flip and the membership
    /// insert commit together; the 'pending' predicate on the UPDATE makes a
    /// second accept lose cleanly.
    pub async fn accept(&self, team_id: i64, invitee_id: i64) -> TeamResult<()> {
        let mut tx = self.pool.begin().await?;

        let (count, cap) = team_capacity(&mut tx, team_id).await?;
        if count >= cap {
            return Err(TeamError::TeamFull);
        }

        let result = sqlx::query(
            "UPDATE team_invite_requests SET status = 'accepted'
             WHERE teamId = ? AND inviteeId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(invitee_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::InviteNotFound);
        }

        sqlx::query("INSERT INTO team_members (teamId, userId) VALUES (?, ?)")
            .bind(team_id)
            .bind(invitee_id)
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

        info!(team_id, invitee_id, "accepted team invite");
        Ok(())
    }

    /// Reject an invite as the invitee. The row stays behind as 'rejected';
    /// the pair index then blocks any future invite for this team and user.
    pub async fn reject(&self, team_id: i64, invitee_id: i64) -> TeamResult<()> {
        let result = sqlx::query(
            "UPDATE team_invite_requests SET status = 'rejected'
             WHERE teamId = ? AND inviteeId = ? AND status = 'pending'",
        )
        .bind(team_id)
        .bind(invitee_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamError::InviteNotFound);
        }

        info!(team_id, invitee_id, "rejected team invite");
        Ok(())
    }

    /// Pending invites addressed to the user, enriched with the team name
    /// and the inviter's tag.
    pub async fn list_pending_for_invitee(&self, user_id: i64) -> TeamResult<Vec<PendingInvite>> {
        let rows = sqlx::query(
            "SELECT i.id, i.teamId, i.inviterId, i.inviteeId, t.name AS teamName, u.gamerTag
             FROM team_invite_requests i
             JOIN teams t ON t.id = i.teamId
             JOIN users u ON u.id = i.inviterId
             WHERE i.inviteeId = ? AND i.status = 'pending'
             ORDER BY i.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PendingInvite {
                    invite_id: row
                        .try_get("id")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    team_id: row
                        .try_get("teamId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    inviter_id: row
                        .try_get("inviterId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    invitee_id: row
                        .try_get("inviteeId")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    team_name: row
                        .try_get("teamName")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                    inviter_gamer_tag: row
                        .try_get("gamerTag")
                        .map_err(|e| TeamError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Pending invites sent by a batch of teams, for the grouped view.
    pub async fn list_pending_for_teams(&self, team_ids: &[i64]) -> TeamResult<Vec<TeamInvite>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = team_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            "SELECT id, teamId, inviterId, inviteeId, status, dateSent
             FROM team_invite_requests
             WHERE teamId IN ({}) AND status = 'pending'
             ORDER BY teamId, id",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for team_id in team_ids {
            query = query.bind(team_id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_invite).collect()
    }
}
