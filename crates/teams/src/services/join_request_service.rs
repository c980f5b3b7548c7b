//! Player-to-captain join-request flow.

use crate::services::revalidation::RevalidationHandle;
use crate::services::with_retry;
use roster_database::entities::{PendingJoinRequest, TeamJoinRequest};
use roster_database::repos::JoinRequestRepository;
use roster_database::types::TeamResult;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct JoinRequestService {
    join_requests: JoinRequestRepository,
    revalidation: RevalidationHandle,
}

impl JoinRequestService {
    pub fn new(pool: SqlitePool, revalidation: RevalidationHandle) -> Self {
        Self {
            join_requests: JoinRequestRepository::new(pool),
            revalidation,
        }
    }

    /// File a join request against a team.
    pub async fn send(&self, team_id: i64, requester_id: i64) -> TeamResult<TeamJoinRequest> {
        let request = with_retry(|| self.join_requests.create(team_id, requester_id)).await?;
        self.revalidation.notify(requester_id);
        Ok(request)
    }

    /// Withdraw the caller's own pending request.
    pub async fn cancel(&self, team_id: i64, requester_id: i64) -> TeamResult<()> {
        with_retry(|| self.join_requests.cancel(team_id, requester_id)).await?;
        self.revalidation.notify(requester_id);
        Ok(())
    }

    /// Accept a request as the team's captain, adding the requester to the
    /// roster.
    pub async fn accept(&self, team_id: i64, captain_id: i64, requester_id: i64) -> TeamResult<()> {
        with_retry(|| self.join_requests.accept(team_id, captain_id, requester_id)).await?;
        self.revalidation.notify(requester_id);
        Ok(())
    }

    /// Reject a request as the team's captain.
    pub async fn reject(&self, team_id: i64, captain_id: i64, requester_id: i64) -> TeamResult<()> {
        with_retry(|| self.join_requests.reject(team_id, captain_id, requester_id)).await?;
        self.revalidation.notify(requester_id);
        Ok(())
    }

    /// Pending requests the caller has filed.
    pub async fn pending_for(&self, user_id: i64) -> TeamResult<Vec<PendingJoinRequest>> {
        self.join_requests.list_pending_for_requester(user_id).await
    }
}
