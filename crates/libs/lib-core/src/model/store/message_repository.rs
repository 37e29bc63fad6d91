//! # Message Repository
//!
//! Database access layer for messages and the pending-reply lifecycle.
//!
//! Assistant replies are created `pending` and move to a terminal state
//! exactly once. Both finalizers use a guarded UPDATE (`WHERE status =
//! 'pending'`), so a second callback for the same reply affects zero rows and
//! never rewrites a finished record.

use super::models::Message;
use super::DbPool;
use sqlx::query_as;

pub struct MessageRepository;

impl MessageRepository {
    /// Persist a human message. Human messages are immediately terminal.
    pub async fn create_human(
        pool: &DbPool,
        chat_session_id: i64,
        text: &str,
    ) -> Result<Message, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO messages (chat_session_id, sender, text, status) VALUES (?, 'human', ?, 'completed')",
        )
        .bind(chat_session_id)
        .bind(text)
        .execute(pool)
        .await?;

        Self::fetch(pool, result.last_insert_rowid()).await
    }

    /// Reserve a pending assistant reply row; its id is the poll handle.
    pub async fn create_pending_reply(
        pool: &DbPool,
        chat_session_id: i64,
    ) -> Result<Message, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO messages (chat_session_id, sender, text, status) VALUES (?, 'assistant', '', 'pending')",
        )
        .bind(chat_session_id)
        .execute(pool)
        .await?;

        Self::fetch(pool, result.last_insert_rowid()).await
    }

    /// Find a message by id.
    pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Message>, sqlx::Error> {
        query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a session's messages in creation order.
    pub async fn list_for_session(
        pool: &DbPool,
        chat_session_id: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        query_as::<_, Message>(
            "SELECT * FROM messages WHERE chat_session_id = ? ORDER BY created_at, id",
        )
        .bind(chat_session_id)
        .fetch_all(pool)
        .await
    }

    /// Complete a pending reply with its text.
    ///
    /// Returns false when the reply was already terminal (no row updated).
    pub async fn finalize_completed(
        pool: &DbPool,
        id: i64,
        text: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET text = ?, status = 'completed' WHERE id = ? AND status = 'pending'",
        )
        .bind(text)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail a pending reply. Returns false when it was already terminal.
    pub async fn finalize_failed(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE messages SET status = 'failed' WHERE id = ? AND status = 'pending'")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch(pool: &DbPool, id: i64) -> Result<Message, sqlx::Error> {
        query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::models::{ReplyStatus, Role, Sender, UserForCreate};
    use crate::model::store::test_support::setup_test_db;
    use crate::model::store::{SessionRepository, UserRepository};

    async fn seed_session(pool: &DbPool) -> i64 {
        let user = UserRepository::create(
            pool,
            UserForCreate {
                name: "alice".to_string(),
                email: None,
                password_hash: "hash".to_string(),
                role: Role::User,
            },
        )
        .await
        .expect("user create should succeed");

        SessionRepository::create(pool, user.id)
            .await
            .expect("session create should succeed")
            .id
    }

    #[tokio::test]
    async fn test_human_message_is_terminal() {
        let pool = setup_test_db().await;
        let session_id = seed_session(&pool).await;

        let message = MessageRepository::create_human(&pool, session_id, "hello")
            .await
            .expect("create should succeed");

        assert_eq!(message.sender, Sender::Human);
        assert_eq!(message.status, ReplyStatus::Completed);
        assert_eq!(message.text, "hello");
    }

    #[tokio::test]
    async fn test_pending_reply_lifecycle() {
        let pool = setup_test_db().await;
        let session_id = seed_session(&pool).await;

        let reply = MessageRepository::create_pending_reply(&pool, session_id)
            .await
            .expect("create should succeed");
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.status, ReplyStatus::Pending);
        assert!(reply.text.is_empty());

        let updated = MessageRepository::finalize_completed(&pool, reply.id, "hi there")
            .await
            .expect("finalize should succeed");
        assert!(updated);

        let stored = MessageRepository::find_by_id(&pool, reply.id)
            .await
            .expect("query should succeed")
            .expect("reply should exist");
        assert_eq!(stored.status, ReplyStatus::Completed);
        assert_eq!(stored.text, "hi there");
    }

    #[tokio::test]
    async fn test_finalize_is_single_shot() {
        let pool = setup_test_db().await;
        let session_id = seed_session(&pool).await;

        let reply = MessageRepository::create_pending_reply(&pool, session_id)
            .await
            .expect("create should succeed");

        assert!(MessageRepository::finalize_failed(&pool, reply.id)
            .await
            .expect("finalize should succeed"));

        // A late completion must not resurrect a failed reply
        let late = MessageRepository::finalize_completed(&pool, reply.id, "late")
            .await
            .expect("finalize should run");
        assert!(!late);

        let stored = MessageRepository::find_by_id(&pool, reply.id)
            .await
            .expect("query should succeed")
            .expect("reply should exist");
        assert_eq!(stored.status, ReplyStatus::Failed);
        assert!(stored.text.is_empty());
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let pool = setup_test_db().await;
        let session_id = seed_session(&pool).await;

        MessageRepository::create_human(&pool, session_id, "first")
            .await
            .expect("create should succeed");
        MessageRepository::create_pending_reply(&pool, session_id)
            .await
            .expect("create should succeed");
        MessageRepository::create_human(&pool, session_id, "second")
            .await
            .expect("create should succeed");

        let listed = MessageRepository::list_for_session(&pool, session_id)
            .await
            .expect("list should succeed");
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].text, "first");
        assert_eq!(listed[2].text, "second");
    }
}
