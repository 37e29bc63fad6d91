use serde::{Deserialize, Serialize};

use super::message::MessageDto;

/// Chat session as exposed over the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSessionDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub visibility: bool,
    pub created_at: String,
}

/// Session list response (newest first)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionListResponse {
    pub sessions: Vec<ChatSessionDto>,
}

/// Session transcript response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionHistoryResponse {
    pub session: ChatSessionDto,
    pub messages: Vec<MessageDto>,
}

/// Visibility toggle response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibilityResponse {
    pub message: String,
    pub visibility: bool,
}

/// Session deletion response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteSessionResponse {
    pub message: String,
}
