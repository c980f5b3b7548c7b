//! HTTP-level tests: routing, the response envelope, and status mapping.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use roster_config::IdentityConfig;
use roster_database::entities::CreateUserRequest;
use roster_database::repos::UserRepository;
use roster_gateway::{build_router, AppState};
use roster_identity::StaticIdentityProvider;
use roster_teams::RevalidationHandle;
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../database/migrations");

const PRINCIPAL_HEADER: &str = "x-principal-id";

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    router: Router,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("gateway.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        // Principals ext_alice/ext_bob/ext_cara map to seeded local users;
        // ext_ghost resolves to an email with no local row.
        let provider = Arc::new(StaticIdentityProvider::new([
            ("ext_alice".to_string(), "alice@example.com".to_string()),
            ("ext_bob".to_string(), "bob@example.com".to_string()),
            ("ext_cara".to_string(), "cara@example.com".to_string()),
            ("ext_ghost".to_string(), "ghost@example.com".to_string()),
        ]));

        let users = UserRepository::new(pool.clone());
        for (email, tag) in [
            ("alice@example.com", "alice"),
            ("bob@example.com", "bob"),
            ("cara@example.com", "cara"),
        ] {
            users
                .create(&CreateUserRequest {
                    email: email.to_string(),
                    phone: None,
                    gamer_tag: Some(tag.to_string()),
                })
                .await?;
        }

        let state = AppState::new(
            pool.clone(),
            provider,
            &IdentityConfig::default(),
            RevalidationHandle::default(),
        );

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            router: build_router(state),
        })
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        principal: Option<&str>,
        body: Option<Value>,
    ) -> TestResult<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(principal) = principal {
            builder = builder.header(PRINCIPAL_HEADER, principal);
        }

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }
}

#[tokio::test]
async fn health_endpoint_reports_ok() -> TestResult {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx.request("GET", "/api/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn missing_principal_is_unauthenticated() -> TestResult {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx.request("GET", "/api/teams/mine", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHENTICATED");
    Ok(())
}

#[tokio::test]
async fn unonboarded_principal_is_rejected() -> TestResult {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx
        .request("GET", "/api/teams/mine", Some("ext_ghost"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NO_LOCAL_USER");

    let (status, body) = ctx
        .request("GET", "/api/teams/mine", Some("ext_nobody"), None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NO_EMAIL");
    Ok(())
}

#[tokio::test]
async fn create_team_returns_envelope() -> TestResult {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_alice"),
            Some(json!({"name": "Reapers", "type": "duo"})),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Team created.");
    assert_eq!(body["data"]["name"], "Reapers");
    assert_eq!(body["data"]["teamType"], "duo");

    // Captain membership exists from the same commit.
    let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM team_members")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(members, 1);
    Ok(())
}

#[tokio::test]
async fn validation_errors_carry_field_detail() -> TestResult {
    let ctx = TestContext::new().await?;

    let (status, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_alice"),
            Some(json!({"name": "ab", "type": "trio"})),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["kind"], "VALIDATION");
    assert_eq!(body["error"]["fields"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn invite_accept_flow_over_http() -> TestResult {
    let ctx = TestContext::new().await?;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_alice"),
            Some(json!({"name": "Reapers", "type": "duo"})),
        )
        .await?;
    let team_id = body["data"]["id"].as_i64().unwrap();
    let bob_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = 'bob@example.com'")
        .fetch_one(&ctx.pool)
        .await?;

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/invites"),
            Some("ext_alice"),
            Some(json!({"inviteeId": bob_id})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Invite sent successfully.");

    let (status, body) = ctx
        .request("GET", "/api/invites/mine", Some("ext_bob"), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["teamName"], "Reapers");
    assert_eq!(body["data"][0]["inviterGamerTag"], "alice");

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/invites/accept"),
            Some("ext_bob"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Invite accepted successfully.");

    // Second accept loses: the invite is no longer pending.
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/invites/accept"),
            Some("ext_bob"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    // And the duo is now full for cara.
    let cara_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = 'cara@example.com'")
        .fetch_one(&ctx.pool)
        .await?;
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/invites"),
            Some("ext_alice"),
            Some(json!({"inviteeId": cara_id})),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "TEAM_FULL");
    Ok(())
}

#[tokio::test]
async fn join_request_flow_over_http() -> TestResult {
    let ctx = TestContext::new().await?;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_alice"),
            Some(json!({"name": "Raiders", "type": "squad"})),
        )
        .await?;
    let team_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/join-requests"),
            Some("ext_bob"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Join request sent successfully");
    let bob_id = body["data"]["requesterId"].as_i64().unwrap();

    // Bob cannot decide his own request.
    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/join-requests/{bob_id}/accept"),
            Some("ext_bob"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/join-requests/{bob_id}/accept"),
            Some("ext_alice"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Join request accepted successfully.");

    let (status, body) = ctx
        .request(
            "POST",
            &format!("/api/teams/{team_id}/join-requests"),
            Some("ext_bob"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ALREADY_MEMBER");
    Ok(())
}

#[tokio::test]
async fn captain_removal_is_forbidden() -> TestResult {
    let ctx = TestContext::new().await?;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_alice"),
            Some(json!({"name": "Raiders", "type": "squad"})),
        )
        .await?;
    let team_id = body["data"]["id"].as_i64().unwrap();
    let captain_id = body["data"]["captainId"].as_i64().unwrap();

    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/api/teams/{team_id}/members/{captain_id}"),
            Some("ext_alice"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn search_endpoints_filter_caller() -> TestResult {
    let ctx = TestContext::new().await?;

    ctx.request(
        "POST",
        "/api/teams",
        Some("ext_alice"),
        Some(json!({"name": "Night Reapers", "type": "duo"})),
    )
    .await?;
    ctx.request(
        "POST",
        "/api/teams",
        Some("ext_bob"),
        Some(json!({"name": "Day Reapers", "type": "squad"})),
    )
    .await?;

    let (status, body) = ctx
        .request(
            "GET",
            "/api/teams/search?q=Reapers",
            Some("ext_alice"),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["name"], "Day Reapers");

    let (status, body) = ctx
        .request("GET", "/api/users/search?q=a", Some("ext_alice"), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    let tags: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["gamerTag"].as_str().unwrap())
        .collect();
    assert!(tags.contains(&"cara"));
    assert!(!tags.contains(&"alice"));

    // Blank queries are rejected.
    let (status, body) = ctx
        .request("GET", "/api/teams/search?q=%20", Some("ext_alice"), None)
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "VALIDATION");
    Ok(())
}

#[tokio::test]
async fn account_view_bundles_everything() -> TestResult {
    let ctx = TestContext::new().await?;

    let (_, body) = ctx
        .request(
            "POST",
            "/api/teams",
            Some("ext_bob"),
            Some(json!({"name": "Raiders", "type": "squad"})),
        )
        .await?;
    let team_id = body["data"]["id"].as_i64().unwrap();
    let alice_id: i64 =
        sqlx::query_scalar("SELECT id FROM users WHERE email = 'alice@example.com'")
            .fetch_one(&ctx.pool)
            .await?;

    ctx.request(
        "POST",
        &format!("/api/teams/{team_id}/invites"),
        Some("ext_bob"),
        Some(json!({"inviteeId": alice_id})),
    )
    .await?;

    let (status, body) = ctx
        .request("GET", "/api/users/me", Some("ext_alice"), None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["teams"].as_array().map(Vec::len), Some(0));
    assert_eq!(
        body["data"]["pendingInvites"][0]["teamName"],
        "Raiders"
    );
    Ok(())
}
