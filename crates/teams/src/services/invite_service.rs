//! Captain-to-player invite flow.

use crate::services::revalidation::RevalidationHandle;
use crate::services::with_retry;
use roster_database::entities::{PendingInvite, TeamInvite};
use roster_database::repos::InviteRepository;
use roster_database::types::TeamResult;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct InviteService {
    invites: InviteRepository,
    revalidation: RevalidationHandle,
}

impl InviteService {
    pub fn new(pool: SqlitePool, revalidation: RevalidationHandle) -> Self {
        Self {
            invites: InviteRepository::new(pool),
            revalidation,
        }
    }

    /// Send an invite as the team's captain.
    pub async fn send(
        &self,
        team_id: i64,
        captain_id: i64,
        invitee_id: i64,
    ) -> TeamResult<TeamInvite> {
        let invite = with_retry(|| self.invites.create(team_id, captain_id, invitee_id)).await?;
        self.revalidation.notify(invitee_id);
        Ok(invite)
    }

    /// Withdraw a pending invite as the team's captain.
    pub async fn cancel(&self, team_id: i64, captain_id: i64, invitee_id: i64) -> TeamResult<()> {
        with_retry(|| self.invites.cancel(team_id, captain_id, invitee_id)).await?;
        self.revalidation.notify(invitee_id);
        Ok(())
    }

    /// Accept a pending invite as its invitee, joining the team.
    pub async fn accept(&self, team_id: i64, invitee_id: i64) -> TeamResult<()> {
        with_retry(|| self.invites.accept(team_id, invitee_id)).await?;
        self.revalidation.notify(invitee_id);
        Ok(())
    }

    /// Reject a pending invite as its invitee.
    pub async fn reject(&self, team_id: i64, invitee_id: i64) -> TeamResult<()> {
        with_retry(|| self.invites.reject(team_id, invitee_id)).await?;
        self.revalidation.notify(invitee_id);
        Ok(())
    }

    /// Pending invites addressed to the caller.
    pub async fn pending_for(&self, user_id: i64) -> TeamResult<Vec<PendingInvite>> {
        self.invites.list_pending_for_invitee(user_id).await
    }
}
