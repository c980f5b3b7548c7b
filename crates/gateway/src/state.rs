use axum::http::HeaderMap;
use roster_config::IdentityConfig;
use roster_database::entities::User;
use roster_identity::{IdentityProvider, IdentityResolver};
use roster_teams::{InviteService, JoinRequestService, RevalidationHandle, TeamService};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    teams: TeamService,
    invites: InviteService,
    join_requests: JoinRequestService,
    resolver: IdentityResolver,
    principal_header: String,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn IdentityProvider>,
        identity: &IdentityConfig,
        revalidation: RevalidationHandle,
    ) -> Self {
        let resolver = IdentityResolver::new(
            provider,
            roster_database::repos::UserRepository::new(pool.clone()),
        );

        Self {
            teams: TeamService::new(pool.clone(), revalidation.clone()),
            invites: InviteService::new(pool.clone(), revalidation.clone()),
            join_requests: JoinRequestService::new(pool, revalidation),
            resolver,
            principal_header: identity.principal_header.clone(),
        }
    }

    pub fn teams(&self) -> &TeamService {
        &self.teams
    }

    pub fn invites(&self) -> &InviteService {
        &self.invites
    }

    pub fn join_requests(&self) -> &JoinRequestService {
        &self.join_requests
    }

    /// Resolve the caller from the principal header. Every handler that acts
    /// on behalf of a user starts here.
    pub async fn current_user(&self, headers: &HeaderMap) -> Result<User, ApiError> {
        let principal = headers
            .get(&self.principal_header)
            .and_then(|value| value.to_str().ok());

        self.resolver
            .resolve(principal)
            .await
            .map_err(ApiError::from)
    }
}
