//! # Admin Handlers
//!
//! User administration: list, create, delete. All routes sit behind the admin
//! gate; the role check happens in middleware.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use lib_core::{
    error::{AppError, Result},
    model::store::models::{Role, User, UserForCreate},
    model::store::UserRepository,
    DbPool,
};
use lib_utils::time::format_time;
use lib_utils::validation::{validate_email, validate_max_length, validate_not_empty};
use shared::{CreateUserRequest, CreateUserResponse, DeleteUserResponse, ListUsersResponse, UserInfo};
use tracing::{info, warn};

fn to_user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        is_active: user.is_active,
        created_at: format_time(user.created_at),
    }
}

/// List all user accounts.
pub async fn list_users(State(pool): State<DbPool>) -> Result<Json<ListUsersResponse>> {
    let users = UserRepository::list_all(&pool).await?;

    Ok(Json(ListUsersResponse {
        users: users.iter().map(to_user_info).collect(),
    }))
}

/// Create a user account. New accounts always get the `user` role.
pub async fn create_user(
    State(pool): State<DbPool>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    validate_not_empty(&req.name, "name").map_err(AppError::InvalidInput)?;
    validate_max_length(&req.name, 255, "name").map_err(AppError::InvalidInput)?;
    if let Some(email) = &req.email {
        validate_email(email).map_err(AppError::InvalidInput)?;
    }

    // hash_password enforces the minimum password length
    let password_hash = lib_auth::hash_password(&req.password).map_err(AppError::InvalidInput)?;

    if UserRepository::find_by_name(&pool, &req.name).await?.is_some() {
        warn!("[ADMIN] Name already taken: {}", req.name);
        return Err(AppError::Conflict("Name already taken".to_string()));
    }
    if let Some(email) = &req.email {
        if UserRepository::find_by_email(&pool, email).await?.is_some() {
            warn!("[ADMIN] Email already registered: {}", email);
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
    }

    let user = UserRepository::create(
        &pool,
        UserForCreate {
            name: req.name,
            email: req.email,
            password_hash,
            role: Role::User,
        },
    )
    .await?;

    info!("[ADMIN] User created: {} (id: {})", user.name, user.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user: to_user_info(&user),
        }),
    ))
}

/// Delete a user account. Admin accounts (the seeded root included) are
/// undeletable.
pub async fn delete_user(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteUserResponse>> {
    let user = UserRepository::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user with id {}", id)))?;

    if user.role == Role::Admin {
        warn!("[ADMIN] Refused to delete admin account: {}", user.name);
        return Err(AppError::Forbidden("Root user can't be deleted".to_string()));
    }

    UserRepository::delete(&pool, user.id).await?;
    info!("[ADMIN] User deleted: {} (id: {})", user.name, user.id);

    Ok(Json(DeleteUserResponse {
        message: "User deleted".to_string(),
        deleted_id: user.id,
    }))
}
