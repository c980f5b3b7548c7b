use anyhow::Context;
use clap::{Parser, Subcommand};
use roster_config::load as load_config;
use roster_database::entities::CreateUserRequest;
use roster_database::repos::{TeamRepository, UserRepository};
use roster_gateway::{build_router, AppState};
use roster_runtime::{telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "roster-backend")]
#[command(about = "Roster backend (server by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Seed the database with a few users and a team
    SeedData,
    /// Dump teams, members, and both pending flows
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting roster backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    // Account views go stale on every mutation; the subscriber stands in for
    // the presentation layer's cache refresh hook.
    let mut revalidations = services.revalidation.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = revalidations.recv().await {
            info!(user_id = event.user_id, "account view revalidation");
        }
    });

    let state = AppState::new(
        services.db_pool.clone(),
        services.identity_provider.clone(),
        &config.identity,
        services.revalidation.clone(),
    );
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(roster_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    let teams = TeamRepository::new(services.db_pool.clone());

    let mut captain_id = None;
    for (email, tag) in [
        ("alice@example.com", "alice"),
        ("bob@example.com", "bob"),
        ("cara@example.com", "cara"),
    ] {
        match users
            .create(&CreateUserRequest {
                email: email.to_string(),
                phone: None,
                gamer_tag: Some(tag.to_string()),
            })
            .await
        {
            Ok(user) => {
                info!(user_id = user.id, email, "seeded user");
                captain_id.get_or_insert(user.id);
            }
            Err(error) => info!(email, %error, "skipping user"),
        }
    }

    if let Some(captain_id) = captain_id {
        let team = teams
            .create(captain_id, "Reapers", roster_database::entities::TeamType::Duo)
            .await
            .map_err(|e| anyhow::anyhow!("failed to seed team: {e}"))?;
        info!(team_id = team.id, "seeded team");
    }

    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let pool = &services.db_pool;

    println!("=== USERS ===");
    for row in sqlx::query("SELECT id, email, gamerTag FROM users ORDER BY id")
        .fetch_all(pool)
        .await?
    {
        let id: i64 = row.get("id");
        let email: String = row.get("email");
        let tag: Option<String> = row.get("gamerTag");
        println!("{:<5} {:<30} {}", id, email, tag.as_deref().unwrap_or("NULL"));
    }

    println!("=== TEAMS ===");
    for row in sqlx::query("SELECT id, name, captainId, type FROM teams ORDER BY id")
        .fetch_all(pool)
        .await?
    {
        let id: i64 = row.get("id");
        let name: String = row.get("name");
        let captain: i64 = row.get("captainId");
        let team_type: String = row.get("type");
        println!("{:<5} {:<30} captain={:<5} {}", id, name, captain, team_type);
    }

    println!("=== MEMBERS ===");
    for row in sqlx::query("SELECT teamId, userId FROM team_members ORDER BY teamId, userId")
        .fetch_all(pool)
        .await?
    {
        let team_id: i64 = row.get("teamId");
        let user_id: i64 = row.get("userId");
        println!("team={:<5} user={}", team_id, user_id);
    }

    println!("=== INVITES ===");
    for row in sqlx::query(
        "SELECT id, teamId, inviterId, inviteeId, status, dateSent
         FROM team_invite_requests ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    {
        let id: i64 = row.get("id");
        let team_id: i64 = row.get("teamId");
        let inviter: i64 = row.get("inviterId");
        let invitee: i64 = row.get("inviteeId");
        let status: String = row.get("status");
        let sent: String = row.get("dateSent");
        println!(
            "{:<5} team={:<5} inviter={:<5} invitee={:<5} {:<10} {}",
            id, team_id, inviter, invitee, status, sent
        );
    }

    println!("=== JOIN REQUESTS ===");
    for row in sqlx::query(
        "SELECT id, teamId, requesterId, status, dateRequested
         FROM team_join_requests ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    {
        let id: i64 = row.get("id");
        let team_id: i64 = row.get("teamId");
        let requester: i64 = row.get("requesterId");
        let status: String = row.get("status");
        let requested: String = row.get("dateRequested");
        println!(
            "{:<5} team={:<5} requester={:<5} {:<10} {}",
            id, team_id, requester, status, requested
        );
    }

    Ok(())
}
