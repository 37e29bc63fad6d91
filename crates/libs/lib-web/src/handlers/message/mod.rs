//! # Message Handlers
//!
//! The asynchronous reply handshake:
//!
//! 1. `send_message` persists the human message, creates a pending assistant
//!    reply row, and forwards the job to the external worker.
//! 2. The worker eventually POSTs `handle_callback` with the outcome.
//! 3. The client polls `check_status` on the reply id until it turns terminal.
//!
//! The pending row is the single source of truth for the handshake; it moves
//! to `completed` or `failed` exactly once, enforced by a guarded UPDATE in
//! the repository.

use axum::{
    extract::{Extension, Json, Path, State},
    http::{HeaderMap, StatusCode},
};
use lib_auth::Claims;
use lib_core::{
    error::{AppError, Result},
    model::store::models::{ReplyStatus, Sender},
    model::store::{MessageRepository, SessionRepository},
    Config, DbPool,
};
use lib_utils::validation::validate_not_empty;
use shared::{
    CallbackOutcome, ReplyStatusDto, SendMessageRequest, SendMessageResponse, StatusResponse,
    WorkerCallbackRequest, WorkerCallbackResponse, WorkerForwardRequest,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::dispatch::{secrets_match, WorkerForwarder};


/// Submit a message to a session and dispatch it to the AI worker.
///
/// The human message is persisted before the worker is contacted, so a worker
/// outage never loses user input. On forward failure the pending reply is
/// marked failed and the caller gets 503; there is no retry.
pub async fn send_message(
    State(pool): State<DbPool>,
    State(worker): State<Arc<dyn WorkerForwarder>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>)> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    validate_not_empty(&req.message, "message").map_err(AppError::InvalidInput)?;

    let session = SessionRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No session with id {}", id)))?;

    if session.user_id != user_id {
        warn!(
            "[MESSAGE] User {} tried to post into session {} owned by {}",
            user_id, session.id, session.user_id
        );
        return Err(AppError::Forbidden("Not your session".to_string()));
    }

    let human = MessageRepository::create_human(&pool, session.id, &req.message).await?;
    let reply = MessageRepository::create_pending_reply(&pool, session.id).await?;

    debug!(
        "[MESSAGE] Session {}: human message {} persisted, reply {} pending",
        session.id, human.id, reply.id
    );

    let forward = WorkerForwardRequest {
        message: req.message.clone(),
        session_id: session.id,
        message_id: reply.id,
    };

    if let Err(e) = worker.forward(&forward).await {
        // The human message stays; only the reply is abandoned.
        MessageRepository::finalize_failed(&pool, reply.id).await?;
        warn!(
            "[MESSAGE] Dispatch failed for reply {}: {}. Reply marked failed.",
            reply.id, e
        );
        return Err(e);
    }

    info!(
        "[MESSAGE] Dispatched message {} (reply {}) for session {}",
        human.id, reply.id, session.id
    );

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            user_message: req.message,
            bot_message_id: reply.id,
        }),
    ))
}

/// Poll the delivery status of an assistant reply.
///
/// Visible to the session owner, and to any authenticated user while the
/// parent session is visible; anything else masks as 404. `text` is carried
/// only once the reply completed.
pub async fn check_status(
    State(pool): State<DbPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<StatusResponse>> {
    let user_id = claims.user_id().map_err(AppError::Unauthorized)?;

    let message = MessageRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No message with id {}", id)))?;

    let session = SessionRepository::find_by_id(&pool, message.chat_session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No message with id {}", id)))?;

    if session.user_id != user_id && !session.visibility {
        return Err(AppError::NotFound(format!("No message with id {}", id)));
    }

    let (status, text) = match message.status {
        ReplyStatus::Pending => (ReplyStatusDto::Pending, None),
        ReplyStatus::Completed => (ReplyStatusDto::Completed, Some(message.text)),
        ReplyStatus::Failed => (ReplyStatusDto::Failed, None),
    };

    Ok(Json(StatusResponse { status, text }))
}

/// Receive the worker's outcome for a pending reply.
///
/// Authenticated by the `X-API-KEY` shared secret, never by a bearer token.
/// The transition to a terminal state happens at most once; a repeated or
/// late callback gets 409 and changes nothing.
pub async fn handle_callback(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    headers: HeaderMap,
    Json(req): Json<WorkerCallbackRequest>,
) -> Result<Json<WorkerCallbackResponse>> {
    let provided = headers
        .get("X-API-KEY")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("[CALLBACK] Missing X-API-KEY header");
            AppError::Unauthorized("Missing worker credentials".to_string())
        })?;

    if !secrets_match(provided, &config.worker_api_key) {
        warn!("[CALLBACK] Shared secret mismatch");
        return Err(AppError::Unauthorized("Invalid worker credentials".to_string()));
    }

    let message = MessageRepository::find_by_id(&pool, req.message_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No message with id {}", req.message_id)))?;

    if message.sender != Sender::Assistant || message.status.is_terminal() {
        warn!(
            "[CALLBACK] Reply {} already finalized as {}",
            message.id, message.status
        );
        return Err(AppError::AlreadyFinalized(format!(
            "Message {} is not awaiting a reply",
            message.id
        )));
    }

    let updated = match req.status {
        CallbackOutcome::Completed => {
            let text = req
                .text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    AppError::InvalidInput("Completed callback requires text".to_string())
                })?;
            MessageRepository::finalize_completed(&pool, message.id, text).await?
        }
        CallbackOutcome::Failed => MessageRepository::finalize_failed(&pool, message.id).await?,
    };

    // Lost the race against a concurrent callback
    if !updated {
        return Err(AppError::AlreadyFinalized(format!(
            "Message {} is not awaiting a reply",
            message.id
        )));
    }

    info!(
        "[CALLBACK] Reply {} finalized as {:?}",
        message.id, req.status
    );

    Ok(Json(WorkerCallbackResponse {
        message: "Callback accepted".to_string(),
    }))
}
