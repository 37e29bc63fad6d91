//! # Reply Poll Loop
//!
//! State machine that waits for an asynchronous AI reply. After submission
//! the reply id is polled every few seconds until the backend reports a
//! terminal state, the attempt budget runs out, or the caller cancels.
//!
//! The loop is keyed on the reply id returned at submission, never on the
//! session, so switching sessions client-side simply cancels the token and
//! the stale loop stops touching the transcript. Server-side work continues
//! regardless.

use crate::api::{ApiClient, ClientError};
use async_trait::async_trait;
use shared::{ReplyStatusDto, StatusResponse};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Poll cadence and budget. Defaults match the backend's expectations:
/// a 3 second tick, 100 attempts, roughly five minutes of patience.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 100,
        }
    }
}

/// Where the poll loop ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Nothing in flight.
    Idle,
    /// Submitted; polling the reply id.
    AwaitingReply { message_id: i64 },
    /// Reply arrived with text.
    Delivered(String),
    /// The worker (or the dispatch call) reported failure. Carries the
    /// user-visible error text rendered in place of a reply.
    Failed(String),
    /// Attempt budget exhausted while the reply stayed pending.
    TimedOut,
    /// The observer abandoned the poll. The transcript is left alone.
    Cancelled,
}

/// Status lookup seam, so the loop can be driven by a scripted source in
/// tests.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn check_status(&self, message_id: i64) -> Result<StatusResponse, ClientError>;
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn check_status(&self, message_id: i64) -> Result<StatusResponse, ClientError> {
        ApiClient::check_status(self, message_id).await
    }
}

/// Poll a reply id until it terminates.
///
/// Errors from the status call are swallowed and retried at the next tick;
/// a flaky network never kills an in-flight reply early.
pub async fn poll_reply(
    source: &dyn StatusSource,
    message_id: i64,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> PollState {
    // Check first, then wait: an already-terminal reply costs no tick.
    for attempt in 1..=config.max_attempts {
        match source.check_status(message_id).await {
            Ok(StatusResponse {
                status: ReplyStatusDto::Completed,
                text,
            }) => {
                return PollState::Delivered(text.unwrap_or_default());
            }
            Ok(StatusResponse {
                status: ReplyStatusDto::Failed,
                ..
            }) => {
                return PollState::Failed("The assistant failed to generate a reply".to_string());
            }
            Ok(_) => {
                debug!("[POLL] Reply {} still pending (attempt {})", message_id, attempt);
            }
            Err(e) => {
                warn!("[POLL] Status check for reply {} failed: {}", message_id, e);
            }
        }

        if attempt == config.max_attempts {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("[POLL] Reply {} abandoned after {} attempts", message_id, attempt);
                return PollState::Cancelled;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    warn!("[POLL] Reply {} timed out", message_id);
    PollState::TimedOut
}

/// Submit a message and wait for its reply.
///
/// A dispatch failure terminates immediately as [`PollState::Failed`] with
/// the error text for the transcript; the backend has already marked the
/// pending reply failed in that case.
pub async fn submit_and_await(
    client: &ApiClient,
    session_id: i64,
    text: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> PollState {
    let submitted = match client.send_message(session_id, text).await {
        Ok(submitted) => submitted,
        Err(e) => {
            warn!("[POLL] Dispatch failed for session {}: {}", session_id, e);
            return PollState::Failed(e.to_string());
        }
    };

    poll_reply(client, submitted.bot_message_id, config, cancel).await
}
