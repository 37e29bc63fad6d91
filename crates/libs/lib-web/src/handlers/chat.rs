//! # Chat Session Handlers
//!
//! Session CRUD and visibility. Sessions list newest first and start life as
//! `Unnamed Session`, visible. Hidden sessions of other users are masked as
//! 404 on read; owner-only mutations answer 403 to non-owners.

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};
use lib_auth::Claims;
use lib_core::{
    error::{AppError, Result},
    model::store::models::{ChatSession, Message, ReplyStatus, Sender},
    model::store::{MessageRepository, SessionRepository},
    DbPool,
};
use lib_utils::time::format_time;
use shared::{
    ChatSessionDto, DeleteSessionResponse, MessageDto, ReplyStatusDto, SenderDto,
    SessionHistoryResponse, SessionListResponse, VisibilityResponse,
};
use tracing::{debug, info};

fn to_session_dto(session: &ChatSession) -> ChatSessionDto {
    ChatSessionDto {
        id: session.id,
        user_id: session.user_id,
        title: session.title.clone(),
        visibility: session.visibility,
        created_at: format_time(session.created_at),
    }
}

fn to_message_dto(message: &Message) -> MessageDto {
    MessageDto {
        id: message.id,
        chat_session_id: message.chat_session_id,
        sender: match message.sender {
            Sender::Human => SenderDto::Human,
            Sender::Assistant => SenderDto::Assistant,
        },
        text: message.text.clone(),
        status: match message.status {
            ReplyStatus::Pending => ReplyStatusDto::Pending,
            ReplyStatus::Completed => ReplyStatusDto::Completed,
            ReplyStatus::Failed => ReplyStatusDto::Failed,
        },
        created_at: format_time(message.created_at),
    }
}

/// Create a fresh session for the caller.
pub async fn create_session(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<ChatSessionDto>)> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let session = SessionRepository::create(&pool, user_id).await?;
    info!("[CHAT] Session {} created by user {}", session.id, user_id);

    Ok((StatusCode::CREATED, Json(to_session_dto(&session))))
}

/// List the caller's visible sessions, newest first.
pub async fn list_sessions(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SessionListResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let sessions = SessionRepository::list_visible_for_user(&pool, user_id).await?;
    debug!("[CHAT] Listed {} sessions for user {}", sessions.len(), user_id);

    Ok(Json(SessionListResponse {
        sessions: sessions.iter().map(to_session_dto).collect(),
    }))
}

/// Fetch a session transcript: the session plus its messages in order.
///
/// Readable by the owner, and by any authenticated user while the session is
/// visible. Hidden sessions of other users answer 404 so their existence
/// stays private.
pub async fn session_history(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<SessionHistoryResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let session = SessionRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session with id {}", id)))?;

    if session.user_id != user_id && !session.visibility {
        return Err(AppError::NotFound(format!("No session with id {}", id)));
    }

    let messages = MessageRepository::list_for_session(&pool, session.id).await?;

    Ok(Json(SessionHistoryResponse {
        session: to_session_dto(&session),
        messages: messages.iter().map(to_message_dto).collect(),
    }))
}

/// Toggle a session's visibility flag. Owner only.
pub async fn toggle_visibility(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<VisibilityResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let session = SessionRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session with id {}", id)))?;

    if session.user_id != user_id {
        return Err(AppError::Forbidden("Not your session".to_string()));
    }

    let visibility = SessionRepository::toggle_visibility(&pool, session.id).await?;
    info!("[CHAT] Session {} visibility now {}", session.id, visibility);

    Ok(Json(VisibilityResponse {
        message: "Visibility updated".to_string(),
        visibility,
    }))
}

/// Delete a session and (via cascade) its messages. Owner only.
pub async fn delete_session(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteSessionResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let session = SessionRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session with id {}", id)))?;

    if session.user_id != user_id {
        return Err(AppError::Forbidden("Not your session".to_string()));
    }

    SessionRepository::delete(&pool, session.id).await?;
    info!("[CHAT] Session {} deleted by user {}", session.id, user_id);

    Ok(Json(DeleteSessionResponse {
        message: "Session deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_user, setup_test_app, token_for, TestApp};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use lib_core::model::store::models::Role;
    use shared::{ChatSessionDto, SessionListResponse, VisibilityResponse};
    use tower::ServiceExt;

    async fn create_session_for(
        app: &axum::Router,
        token: &str,
    ) -> ChatSessionDto {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chats")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_new_session_defaults() {
        // Arrange
        let TestApp { app, pool, .. } = setup_test_app().await;
        let user = seed_user(&pool, "alice", "AlicePassword1", Role::User).await;
        let token = token_for(&user);

        // Act
        let session = create_session_for(&app, &token).await;

        // Assert
        assert_eq!(session.title, "Unnamed Session");
        assert!(session.visibility);
        assert_eq!(session.user_id, user.id);
    }

    #[tokio::test]
    async fn test_list_excludes_hidden_sessions() {
        // Arrange
        let TestApp { app, pool, .. } = setup_test_app().await;
        let user = seed_user(&pool, "alice", "AlicePassword1", Role::User).await;
        let token = token_for(&user);
        let kept = create_session_for(&app, &token).await;
        let hidden = create_session_for(&app, &token).await;

        // Act - hide the second session
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/chats/{}/visibility", hidden.id))
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let toggled: VisibilityResponse = serde_json::from_slice(&body).unwrap();
        assert!(!toggled.visibility);

        // Act - list
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/chats")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Assert - only the visible session remains
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: SessionListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed.sessions.len(), 1);
        assert_eq!(listed.sessions[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_hidden_session_masked_for_other_users() {
        // Arrange
        let TestApp { app, pool, .. } = setup_test_app().await;
        let owner = seed_user(&pool, "alice", "AlicePassword1", Role::User).await;
        let other = seed_user(&pool, "bob", "BobPassword1", Role::User).await;
        let owner_token = token_for(&owner);
        let other_token = token_for(&other);
        let session = create_session_for(&app, &owner_token).await;

        // Hide it
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/chats/{}/visibility", session.id))
                    .header("authorization", format!("Bearer {}", owner_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Act - other user reads the transcript
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/chats/{}", session.id))
                    .header("authorization", format!("Bearer {}", other_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Assert - masked, not forbidden
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The owner still reads it fine
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/chats/{}", session.id))
                    .header("authorization", format!("Bearer {}", owner_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete_or_toggle() {
        // Arrange
        let TestApp { app, pool, .. } = setup_test_app().await;
        let owner = seed_user(&pool, "alice", "AlicePassword1", Role::User).await;
        let other = seed_user(&pool, "bob", "BobPassword1", Role::User).await;
        let owner_token = token_for(&owner);
        let other_token = token_for(&other);
        let session = create_session_for(&app, &owner_token).await;

        // Act / Assert - delete
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/chats/{}", session.id))
                    .header("authorization", format!("Bearer {}", other_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Act / Assert - visibility
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/chats/{}/visibility", session.id))
                    .header("authorization", format!("Bearer {}", other_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_delete_session_by_owner() {
        // Arrange
        let TestApp { app, pool, .. } = setup_test_app().await;
        let user = seed_user(&pool, "alice", "AlicePassword1", Role::User).await;
        let token = token_for(&user);
        let session = create_session_for(&app, &token).await;

        // Act
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/chats/{}", session.id))
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Assert - gone
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/chats/{}", session.id))
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
