use serde::{Deserialize, Serialize};

/// Message sender tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SenderDto {
    Human,
    Assistant,
}

/// Reply delivery status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatusDto {
    Pending,
    Completed,
    Failed,
}

/// Message as exposed over the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDto {
    pub id: i64,
    pub chat_session_id: i64,
    pub sender: SenderDto,
    pub text: String,
    pub status: ReplyStatusDto,
    pub created_at: String,
}

/// Message submission request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Message submission response.
///
/// `bot_message_id` identifies the pending assistant reply; the client polls
/// the status endpoint with it until the reply reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageResponse {
    pub user_message: String,
    pub bot_message_id: i64,
}

/// Status lookup response.
///
/// `text` is present only when `status` is `completed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: ReplyStatusDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Worker callback request body.
///
/// Sent by the external AI worker; authenticated with the shared-secret
/// `X-API-KEY` header, never with a user bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerCallbackRequest {
    pub message_id: i64,
    pub status: CallbackOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Terminal outcome carried by a worker callback
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallbackOutcome {
    Completed,
    Failed,
}

/// Worker callback acknowledgment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerCallbackResponse {
    pub message: String,
}

/// Forward payload sent to the external AI worker webhook.
///
/// `messageId` names the pending reply row the worker must reference in its
/// callback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerForwardRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: i64,
    #[serde(rename = "messageId")]
    pub message_id: i64,
}
