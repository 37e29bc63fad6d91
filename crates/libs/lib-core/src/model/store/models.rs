use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity representing a complete user record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data structure for creating a new user.
///
/// Password must be hashed before creating.
#[derive(Debug, Clone)]
pub struct UserForCreate {
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// User role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        // Unknown roles from old rows degrade to the least privilege
        Role::from_str(&s).unwrap_or(Role::User)
    }
}

/// Chat session entity.
///
/// Owned exclusively by its creating user; deletion cascades to messages.
#[derive(Debug, Clone, FromRow)]
pub struct ChatSession {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub visibility: bool,
    pub created_at: DateTime<Utc>,
}

/// Message sender tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Human,
    Assistant,
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::Human => write!(f, "human"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Sender::Human),
            "assistant" => Ok(Sender::Assistant),
            _ => Err(format!("Invalid sender: {}", s)),
        }
    }
}

impl From<String> for Sender {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        Sender::from_str(&s).unwrap_or(Sender::Assistant)
    }
}

/// Reply delivery status.
///
/// Human messages are stored `Completed`. Assistant replies start `Pending`
/// and transition exactly once to `Completed` or `Failed`; terminal states
/// are final.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Pending,
    Completed,
    Failed,
}

impl ReplyStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReplyStatus::Completed | ReplyStatus::Failed)
    }
}

impl std::fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyStatus::Pending => write!(f, "pending"),
            ReplyStatus::Completed => write!(f, "completed"),
            ReplyStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ReplyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReplyStatus::Pending),
            "completed" => Ok(ReplyStatus::Completed),
            "failed" => Ok(ReplyStatus::Failed),
            _ => Err(format!("Invalid reply status: {}", s)),
        }
    }
}

impl From<String> for ReplyStatus {
    fn from(s: String) -> Self {
        use std::str::FromStr;
        // Fall back to Failed if parsing fails (defensive approach for database data)
        ReplyStatus::from_str(&s).unwrap_or(ReplyStatus::Failed)
    }
}

/// Message entity.
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: i64,
    pub chat_session_id: i64,
    #[sqlx(try_from = "String")]
    pub sender: Sender,
    pub text: String,
    #[sqlx(try_from = "String")]
    pub status: ReplyStatus,
    pub created_at: DateTime<Utc>,
}
