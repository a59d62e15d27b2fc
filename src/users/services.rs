use time::OffsetDateTime;
use tracing::{error, info};

use crate::errors::ApiError;

use super::{
    dto::{CreateUserRequest, LoginRequest, PatchUserRequest},
    repo_types::{User, UserStatus},
    store::UserStore,
};

// TIMESTAMP columns keep whole seconds.
fn now_truncated() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - time::Duration::nanoseconds(i64::from(now.nanosecond()))
}

fn store_failure(e: anyhow::Error, msg: &str) -> ApiError {
    error!(error = ?e, "{}", msg);
    ApiError::internal(msg)
}

pub async fn create_user(store: &dyn UserStore, req: CreateUserRequest) -> Result<User, ApiError> {
    let mut user = User {
        id: 0,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        date_created: now_truncated(),
        status: UserStatus::Active,
        password: req.password,
    };

    store
        .insert(&mut user)
        .await
        .map_err(|e| store_failure(e, "error when trying to save user"))?;

    info!(user_id = user.id, "user created");
    Ok(user)
}

pub async fn get_user(store: &dyn UserStore, user_id: i64) -> Result<User, ApiError> {
    store
        .get(user_id)
        .await
        .map_err(|e| store_failure(e, "error when trying to get user"))?
        .ok_or_else(|| ApiError::not_found(format!("user {} not found", user_id)))
}

/// PUT passes every field, PATCH only the ones present in the body.
pub async fn update_user(
    store: &dyn UserStore,
    user_id: i64,
    patch: PatchUserRequest,
) -> Result<User, ApiError> {
    let mut user = get_user(store, user_id).await?;

    if let Some(first_name) = patch.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }

    store
        .update(&user)
        .await
        .map_err(|e| store_failure(e, "error when trying to update user"))?;

    info!(user_id, "user updated");
    Ok(user)
}

pub async fn delete_user(store: &dyn UserStore, user_id: i64) -> Result<(), ApiError> {
    let deleted = store
        .delete(user_id)
        .await
        .map_err(|e| store_failure(e, "error when trying to delete user"))?;

    if !deleted {
        return Err(ApiError::not_found(format!("user {} not found", user_id)));
    }
    info!(user_id, "user deleted");
    Ok(())
}

pub async fn search_users(
    store: &dyn UserStore,
    status: UserStatus,
) -> Result<Vec<User>, ApiError> {
    let users = store
        .find_by_status(status)
        .await
        .map_err(|e| store_failure(e, "error when trying to find users"))?;

    if users.is_empty() {
        return Err(ApiError::not_found(format!("no users matching status {}", status)));
    }
    Ok(users)
}

pub async fn login_user(store: &dyn UserStore, req: LoginRequest) -> Result<User, ApiError> {
    store
        .find_by_email_and_password(&req.email, &req.password)
        .await
        .map_err(|e| store_failure(e, "error when trying to get user"))?
        .ok_or_else(|| ApiError::not_found("invalid user credentials"))
}
