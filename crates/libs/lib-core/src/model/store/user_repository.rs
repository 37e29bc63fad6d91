//! # User Repository
//!
//! Database access layer for user accounts, including the root admin seed.

use super::models::{Role, User, UserForCreate};
use super::DbPool;
use sqlx::query_as;
use tracing::info;

pub struct UserRepository;

impl UserRepository {
    /// Find a user by their unique name.
    pub async fn find_by_name(pool: &DbPool, name: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by their email address.
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new user.
    ///
    /// Fails with a UNIQUE constraint violation when the name or email is
    /// already taken.
    pub async fn create(pool: &DbPool, user_data: UserForCreate) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, is_active) VALUES (?, ?, ?, ?, 1)",
        )
        .bind(&user_data.name)
        .bind(&user_data.email)
        .bind(&user_data.password_hash)
        .bind(user_data.role.to_string())
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List all users, oldest first.
    pub async fn list_all(pool: &DbPool) -> Result<Vec<User>, sqlx::Error> {
        query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Delete a user by id. Returns true when a row was removed.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Seed the root admin account if it does not exist yet.
    ///
    /// firstOrCreate semantics: an existing `root` user is left untouched,
    /// including its password.
    pub async fn seed_root_admin(
        pool: &DbPool,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        if let Some(existing) = Self::find_by_name(pool, "root").await? {
            return Ok(existing);
        }

        let root = Self::create(
            pool,
            UserForCreate {
                name: "root".to_string(),
                email: Some("root@example.com".to_string()),
                password_hash: password_hash.to_string(),
                role: Role::Admin,
            },
        )
        .await?;

        info!("[SEED] Root admin account created (id: {})", root.id);
        Ok(root)
    }
}
