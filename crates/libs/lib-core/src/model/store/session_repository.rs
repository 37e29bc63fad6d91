//! # Session Repository
//!
//! Database access layer for chat sessions.

use super::models::ChatSession;
use super::DbPool;
use sqlx::query_as;

pub struct SessionRepository;

impl SessionRepository {
    /// Create a new session for a user with the default title and visibility.
    pub async fn create(pool: &DbPool, user_id: i64) -> Result<ChatSession, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO chat_sessions (user_id, title, visibility) VALUES (?, 'Unnamed Session', 1)",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a session by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<ChatSession>, sqlx::Error> {
        query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's visible sessions, newest first.
    pub async fn list_visible_for_user(
        pool: &DbPool,
        user_id: i64,
    ) -> Result<Vec<ChatSession>, sqlx::Error> {
        query_as::<_, ChatSession>(
            "SELECT * FROM chat_sessions WHERE user_id = ? AND visibility = 1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Flip a session's visibility flag, returning the new value.
    pub async fn toggle_visibility(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query("UPDATE chat_sessions SET visibility = NOT visibility WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        let session = query_as::<_, ChatSession>("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(session.visibility)
    }

    /// Delete a session. Messages cascade at the database level.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::models::{Role, UserForCreate};
    use crate::model::store::test_support::setup_test_db;
    use crate::model::store::{MessageRepository, UserRepository};

    async fn seed_user(pool: &DbPool, name: &str) -> i64 {
        UserRepository::create(
            pool,
            UserForCreate {
                name: name.to_string(),
                email: None,
                password_hash: "hash".to_string(),
                role: Role::User,
            },
        )
        .await
        .expect("user create should succeed")
        .id
    }

    #[tokio::test]
    async fn test_create_session_defaults() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;

        let session = SessionRepository::create(&pool, user_id)
            .await
            .expect("session create should succeed");

        assert_eq!(session.title, "Unnamed Session");
        assert!(session.visibility);
        assert_eq!(session.user_id, user_id);
    }

    #[tokio::test]
    async fn test_list_excludes_hidden_sessions() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;

        let visible = SessionRepository::create(&pool, user_id)
            .await
            .expect("create should succeed");
        let hidden = SessionRepository::create(&pool, user_id)
            .await
            .expect("create should succeed");
        SessionRepository::toggle_visibility(&pool, hidden.id)
            .await
            .expect("toggle should succeed");

        let listed = SessionRepository::list_visible_for_user(&pool, user_id)
            .await
            .expect("list should succeed");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, visible.id);
    }

    #[tokio::test]
    async fn test_toggle_visibility_roundtrip() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;
        let session = SessionRepository::create(&pool, user_id)
            .await
            .expect("create should succeed");

        let off = SessionRepository::toggle_visibility(&pool, session.id)
            .await
            .expect("toggle should succeed");
        assert!(!off);

        let on = SessionRepository::toggle_visibility(&pool, session.id)
            .await
            .expect("toggle should succeed");
        assert!(on);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_messages() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, "alice").await;
        let session = SessionRepository::create(&pool, user_id)
            .await
            .expect("create should succeed");

        MessageRepository::create_human(&pool, session.id, "hello")
            .await
            .expect("message create should succeed");

        assert!(SessionRepository::delete(&pool, session.id)
            .await
            .expect("delete should succeed"));

        let remaining = MessageRepository::list_for_session(&pool, session.id)
            .await
            .expect("list should succeed");
        assert!(remaining.is_empty());
    }
}
