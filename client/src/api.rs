//! # API Client
//!
//! Thin typed wrapper over the backend's HTTP API. All calls go through an
//! explicit [`SessionContext`] carrying the base URL and bearer token; there
//! is no ambient global session.

use serde::Deserialize;
use shared::{
    ChatSessionDto, LoginRequest, LoginResponse, SendMessageRequest, SendMessageResponse,
    SessionHistoryResponse, SessionListResponse, StatusResponse,
};
use thiserror::Error;
use tracing::debug;

/// Client-side error taxonomy.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// Transport errors are retried by the poll loop; API errors are not
    /// necessarily transient but the loop treats both the same way.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Error body shape returned by the backend.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Where and as whom to talk to the backend.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub base_url: String,
    pub token: String,
}

/// Authenticated API client bound to one [`SessionContext`].
pub struct ApiClient {
    http: reqwest::Client,
    ctx: SessionContext,
}

impl ApiClient {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            ctx,
        }
    }

    /// Authenticate by name and password, returning a client bound to the
    /// fresh token.
    pub async fn login(base_url: &str, name: &str, password: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::new();
        let response = http
            .post(format!("{}/api/login", base_url))
            .json(&LoginRequest {
                name: name.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let login: LoginResponse = into_json(response).await?;
        debug!("[CLIENT] Logged in as {} ({})", name, login.role);

        Ok(Self {
            http,
            ctx: SessionContext {
                base_url: base_url.to_string(),
                token: login.token,
            },
        })
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Create a fresh chat session.
    pub async fn create_session(&self) -> Result<ChatSessionDto, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/chats", self.ctx.base_url))
            .bearer_auth(&self.ctx.token)
            .send()
            .await?;
        into_json(response).await
    }

    /// List the caller's visible sessions, newest first.
    pub async fn list_sessions(&self) -> Result<SessionListResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/chats", self.ctx.base_url))
            .bearer_auth(&self.ctx.token)
            .send()
            .await?;
        into_json(response).await
    }

    /// Fetch a session transcript.
    pub async fn session_history(
        &self,
        session_id: i64,
    ) -> Result<SessionHistoryResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/chats/{}", self.ctx.base_url, session_id))
            .bearer_auth(&self.ctx.token)
            .send()
            .await?;
        into_json(response).await
    }

    /// Submit a message for dispatch to the AI worker. The returned
    /// `bot_message_id` feeds the poll loop.
    pub async fn send_message(
        &self,
        session_id: i64,
        text: &str,
    ) -> Result<SendMessageResponse, ClientError> {
        let response = self
            .http
            .post(format!(
                "{}/api/chats/{}/messages",
                self.ctx.base_url, session_id
            ))
            .bearer_auth(&self.ctx.token)
            .json(&SendMessageRequest {
                message: text.to_string(),
            })
            .send()
            .await?;
        into_json(response).await
    }

    /// Look up the delivery status of an assistant reply.
    pub async fn check_status(&self, message_id: i64) -> Result<StatusResponse, ClientError> {
        let response = self
            .http
            .get(format!(
                "{}/api/messages/{}/status",
                self.ctx.base_url, message_id
            ))
            .bearer_auth(&self.ctx.token)
            .send()
            .await?;
        into_json(response).await
    }
}

/// Decode a success body, or surface the backend's error message.
async fn into_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
