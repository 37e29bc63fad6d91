use serde::{Deserialize, Serialize};

/// Admin request to create a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

/// User record as exposed to admins (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Response to a user creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateUserResponse {
    pub message: String,
    pub user: UserInfo,
}

/// Response listing all user accounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListUsersResponse {
    pub users: Vec<UserInfo>,
}

/// Response to a user deletion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteUserResponse {
    pub message: String,
    pub deleted_id: i64,
}
