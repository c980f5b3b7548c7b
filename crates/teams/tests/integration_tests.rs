//! End-to-end flows across the team services against a real SQLite store.

use roster_database::entities::CreateUserRequest;
use roster_database::repos::UserRepository;
use roster_database::types::TeamError;
use roster_database::MIGRATOR;
use roster_teams::{InviteService, JoinRequestService, RevalidationHandle, TeamService};
use sqlx::SqlitePool;
use tempfile::TempDir;

struct Fixture {
    pool: SqlitePool,
    teams: TeamService,
    invites: InviteService,
    join_requests: JoinRequestService,
    _temp_dir: TempDir,
}

async fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("flows.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&db_url).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();

    let revalidation = RevalidationHandle::default();
    Fixture {
        teams: TeamService::new(pool.clone(), revalidation.clone()),
        invites: InviteService::new(pool.clone(), revalidation.clone()),
        join_requests: JoinRequestService::new(pool.clone(), revalidation),
        pool,
        _temp_dir: temp_dir,
    }
}

async fn seed_user(pool: &SqlitePool, email: &str, tag: &str) -> i64 {
    UserRepository::new(pool.clone())
        .create(&CreateUserRequest {
            email: email.to_string(),
            phone: None,
            gamer_tag: Some(tag.to_string()),
        })
        .await
        .unwrap()
        .id
}

async fn membership_count(pool: &SqlitePool, team_id: i64, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM team_members WHERE teamId = ? AND userId = ?")
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_team_grants_captain_membership() {
    let f = fixture().await;
    let alice = seed_user(&f.pool, "alice@example.com", "alice").await;

    let team = f.teams.create_team(alice, "Reapers", "duo").await.unwrap();

    assert_eq!(team.name, "Reapers");
    assert_eq!(team.captain_id, alice);
    assert_eq!(membership_count(&f.pool, team.id, alice).await, 1);
}

#[tokio::test]
async fn duo_cap_blocks_third_invite() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;
    let u3 = seed_user(&f.pool, "u3@example.com", "cara").await;

    let team = f.teams.create_team(u1, "Reapers", "duo").await.unwrap();
    f.invites.send(team.id, u1, u2).await.unwrap();
    f.invites.accept(team.id, u2).await.unwrap();

    let err = f.invites.send(team.id, u1, u3).await.unwrap_err();
    assert!(matches!(err, TeamError::TeamFull));
}

#[tokio::test]
async fn cancelled_invite_can_be_reissued() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;

    let team = f.teams.create_team(u1, "Reapers", "duo").await.unwrap();

    f.invites.send(team.id, u1, u2).await.unwrap();
    f.invites.cancel(team.id, u1, u2).await.unwrap();
    f.invites.send(team.id, u1, u2).await.unwrap();

    let pending: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM team_invite_requests WHERE teamId = ? AND status = 'pending'",
    )
    .bind(team.id)
    .fetch_one(&f.pool)
    .await
    .unwrap();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn cancel_leaves_no_orphan_rows() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;

    let team = f.teams.create_team(u1, "Reapers", "duo").await.unwrap();

    f.invites.send(team.id, u1, u2).await.unwrap();
    f.invites.cancel(team.id, u1, u2).await.unwrap();

    let invite_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_invite_requests")
        .fetch_one(&f.pool)
        .await
        .unwrap();
    assert_eq!(invite_rows, 0);

    f.join_requests.send(team.id, u2).await.unwrap();
    f.join_requests.cancel(team.id, u2).await.unwrap();

    let request_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_join_requests")
        .fetch_one(&f.pool)
        .await
        .unwrap();
    assert_eq!(request_rows, 0);
}

#[tokio::test]
async fn double_accept_yields_single_membership() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;

    let team = f.teams.create_team(u1, "Reapers", "duo").await.unwrap();
    f.invites.send(team.id, u1, u2).await.unwrap();

    f.invites.accept(team.id, u2).await.unwrap();
    let err = f.invites.accept(team.id, u2).await.unwrap_err();
    assert!(matches!(err, TeamError::InviteNotFound));

    assert_eq!(membership_count(&f.pool, team.id, u2).await, 1);
}

#[tokio::test]
async fn join_request_flow_promotes_requester() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u3 = seed_user(&f.pool, "u3@example.com", "cara").await;

    let team = f.teams.create_team(u1, "Reapers", "squad").await.unwrap();

    f.join_requests.send(team.id, u3).await.unwrap();
    f.join_requests.accept(team.id, u1, u3).await.unwrap();

    let status: String = sqlx::query_scalar(
        "SELECT status FROM team_join_requests WHERE teamId = ? AND requesterId = ?",
    )
    .bind(team.id)
    .bind(u3)
    .fetch_one(&f.pool)
    .await
    .unwrap();
    assert_eq!(status, "accepted");
    assert_eq!(membership_count(&f.pool, team.id, u3).await, 1);

    let err = f.join_requests.send(team.id, u3).await.unwrap_err();
    assert!(matches!(err, TeamError::AlreadyMember));
}

#[tokio::test]
async fn non_captain_cannot_remove_members() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;
    let u3 = seed_user(&f.pool, "u3@example.com", "cara").await;

    let team = f.teams.create_team(u1, "Reapers", "squad").await.unwrap();
    f.invites.send(team.id, u1, u2).await.unwrap();
    f.invites.accept(team.id, u2).await.unwrap();
    f.invites.send(team.id, u1, u3).await.unwrap();
    f.invites.accept(team.id, u3).await.unwrap();

    let err = f.teams.remove_member(team.id, u2, u3).await.unwrap_err();
    assert!(matches!(err, TeamError::NotCaptain));
    assert_eq!(membership_count(&f.pool, team.id, u3).await, 1);
}

#[tokio::test]
async fn pending_flows_stay_disjoint() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;

    let team = f.teams.create_team(u1, "Reapers", "squad").await.unwrap();

    // An invited user cannot open a join request for the same team.
    f.invites.send(team.id, u1, u2).await.unwrap();
    let err = f.join_requests.send(team.id, u2).await.unwrap_err();
    assert!(matches!(err, TeamError::AlreadyInvited));

    f.invites.cancel(team.id, u1, u2).await.unwrap();

    // And an open join request blocks an invite for the same pair.
    f.join_requests.send(team.id, u2).await.unwrap();
    let err = f.invites.send(team.id, u1, u2).await.unwrap_err();
    assert!(matches!(err, TeamError::AlreadyRequested));
}

#[tokio::test]
async fn grouped_view_shows_teams_from_both_roles() {
    let f = fixture().await;
    let u1 = seed_user(&f.pool, "u1@example.com", "alice").await;
    let u2 = seed_user(&f.pool, "u2@example.com", "bob").await;

    let own = f.teams.create_team(u1, "Reapers", "duo").await.unwrap();
    let other = f.teams.create_team(u2, "Raiders", "squad").await.unwrap();

    f.join_requests.send(other.id, u1).await.unwrap();
    f.join_requests.accept(other.id, u2, u1).await.unwrap();

    let grouped = f.teams.teams_for_user(u1).await.unwrap();
    let mut ids: Vec<i64> = grouped.iter().map(|g| g.team.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![own.id, other.id]);

    for g in &grouped {
        assert!(
            g.members
                .iter()
                .any(|m| m.user_id == g.team.captain_id),
            "captain missing from members of team {}",
            g.team.id
        );
    }
}
