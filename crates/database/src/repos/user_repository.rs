//! User repository for database operations.

use crate::entities::{CreateUserRequest, User};
use crate::types::{UserError, UserResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> UserResult<User> {
    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        email: row
            .try_get("email")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        phone: row
            .try_get("phone")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        gamer_tag: row
            .try_get("gamerTag")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?,
    })
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, phone, gamerTag FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find user by email. This is the lookup the identity resolver relies on.
    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, phone, gamerTag FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(map_user).transpose()
    }

    /// Create a new user row. Used by the onboarding collaborator and seeding.
    pub async fn create(&self, request: &CreateUserRequest) -> UserResult<User> {
        let result = sqlx::query("INSERT INTO users (email, phone, gamerTag) VALUES (?, ?, ?)")
            .bind(&request.email)
            .bind(&request.phone)
            .bind(&request.gamer_tag)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    UserError::EmailAlreadyExists
                } else {
                    UserError::DatabaseError(e.to_string())
                }
            })?;

        let user_id = result.last_insert_rowid();
        info!(user_id, email = %request.email, "created user");

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| UserError::DatabaseError("failed to retrieve created user".to_string()))
    }

    /// Search users by gamer tag, excluding the caller themselves.
    pub async fn search_by_gamer_tag(
        &self,
        query: &str,
        exclude_user_id: i64,
    ) -> UserResult<Vec<User>> {
        let search_pattern = format!("%{}%", query);

        let rows = sqlx::query(
            "SELECT id, email, phone, gamerTag FROM users
             WHERE gamerTag LIKE ? AND id != ?
             ORDER BY gamerTag",
        )
        .bind(search_pattern)
        .bind(exclude_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.iter().map(map_user).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::MIGRATOR;
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_users.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&db_url).await.unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        (pool, temp_dir)
    }

    fn user_request(email: &str, tag: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            phone: None,
            gamer_tag: Some(tag.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let created = repo
            .create(&user_request("alice@example.com", "alice"))
            .await
            .unwrap();
        assert!(created.id > 0);

        let found = repo.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        repo.create(&user_request("alice@example.com", "alice"))
            .await
            .unwrap();

        let err = repo
            .create(&user_request("alice@example.com", "alice2"))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn test_search_excludes_caller() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let alice = repo
            .create(&user_request("alice@example.com", "shadowfox"))
            .await
            .unwrap();
        repo.create(&user_request("bob@example.com", "shadowcat"))
            .await
            .unwrap();

        let results = repo.search_by_gamer_tag("shadow", alice.id).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].gamer_tag.as_deref(), Some("shadowcat"));
    }
}
