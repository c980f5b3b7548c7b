//! Team registry service: creation, updates, roster edits, and the grouped
//! views.

use crate::services::revalidation::RevalidationHandle;
use crate::services::with_retry;
use crate::types::{GroupedTeam, PlayerSummary, UserDetails};
use crate::utils::validation::{validate_search_query, validate_team_input};
use roster_database::entities::{Team, User};
use roster_database::repos::{
    InviteRepository, JoinRequestRepository, MemberRepository, TeamRepository, UserRepository,
};
use roster_database::types::{TeamError, TeamResult};
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Clone)]
pub struct TeamService {
    teams: TeamRepository,
    members: MemberRepository,
    invites: InviteRepository,
    join_requests: JoinRequestRepository,
    users: UserRepository,
    revalidation: RevalidationHandle,
}

impl TeamService {
    pub fn new(pool: SqlitePool, revalidation: RevalidationHandle) -> Self {
        Self {
            teams: TeamRepository::new(pool.clone()),
            members: MemberRepository::new(pool.clone()),
            invites: InviteRepository::new(pool.clone()),
            join_requests: JoinRequestRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            revalidation,
        }
    }

    /// Create a team with the caller as captain.
    pub async fn create_team(
        &self,
        captain_id: i64,
        name: &str,
        team_type: &str,
    ) -> TeamResult<Team> {
        let (name, team_type) = validate_team_input(name, team_type)?;

        let team = with_retry(|| self.teams.create(captain_id, &name, team_type)).await?;
        self.revalidation.notify(captain_id);
        Ok(team)
    }

    /// Rename or resize a team. Captain-only.
    pub async fn update_team(
        &self,
        team_id: i64,
        captain_id: i64,
        name: &str,
        team_type: &str,
    ) -> TeamResult<Team> {
        let (name, team_type) = validate_team_input(name, team_type)?;

        let team = with_retry(|| self.teams.update(team_id, captain_id, &name, team_type)).await?;
        self.revalidation.notify(captain_id);
        Ok(team)
    }

    /// Remove a member from a team's roster. Captain-only; the captain's own
    /// membership cannot be removed.
    pub async fn remove_member(
        &self,
        team_id: i64,
        captain_id: i64,
        member_id: i64,
    ) -> TeamResult<()> {
        with_retry(|| self.members.remove(team_id, captain_id, member_id)).await?;
        self.revalidation.notify(captain_id);
        self.revalidation.notify(member_id);
        Ok(())
    }

    /// All teams the user captains or belongs to, each grouped with its
    /// roster and both pending flows. Four focused queries and an in-memory
    /// join keyed by team id.
    pub async fn teams_for_user(&self, user_id: i64) -> TeamResult<Vec<GroupedTeam>> {
        let teams = self.teams.find_for_user(user_id).await?;
        let team_ids: Vec<i64> = teams.iter().map(|t| t.id).collect();

        let members = self.members.list_for_teams(&team_ids).await?;
        let invites = self.invites.list_pending_for_teams(&team_ids).await?;
        let join_requests = self.join_requests.list_pending_for_teams(&team_ids).await?;

        let mut grouped: Vec<GroupedTeam> = teams
            .into_iter()
            .map(|team| GroupedTeam {
                team,
                members: Vec::new(),
                invites: Vec::new(),
                join_requests: Vec::new(),
            })
            .collect();

        let index: HashMap<i64, usize> = grouped
            .iter()
            .enumerate()
            .map(|(i, g)| (g.team.id, i))
            .collect();

        for member in members {
            if let Some(&i) = index.get(&member.team_id) {
                grouped[i].members.push(member);
            }
        }
        for invite in invites {
            if let Some(&i) = index.get(&invite.team_id) {
                grouped[i].invites.push(invite);
            }
        }
        for request in join_requests {
            if let Some(&i) = index.get(&request.team_id) {
                grouped[i].join_requests.push(request);
            }
        }

        Ok(grouped)
    }

    /// Teams matching the query that the caller could ask to join.
    pub async fn search_teams(&self, query: &str, user_id: i64) -> TeamResult<Vec<Team>> {
        let query = validate_search_query(query)?;
        self.teams.search_by_name(query, user_id).await
    }

    /// Players matching the query that the caller could invite.
    pub async fn search_players(
        &self,
        query: &str,
        user_id: i64,
    ) -> TeamResult<Vec<PlayerSummary>> {
        let query = validate_search_query(query)?;

        let users = self
            .users
            .search_by_gamer_tag(query, user_id)
            .await
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

        Ok(users.into_iter().map(PlayerSummary::from).collect())
    }

    /// The caller's full account view.
    pub async fn user_details(&self, user: &User) -> TeamResult<UserDetails> {
        let teams = self.teams_for_user(user.id).await?;
        let pending_invites = self.invites.list_pending_for_invitee(user.id).await?;
        let pending_join_requests = self
            .join_requests
            .list_pending_for_requester(user.id)
            .await?;

        Ok(UserDetails {
            user: user.clone(),
            teams,
            pending_invites,
            pending_join_requests,
        })
    }
}
