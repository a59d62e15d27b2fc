use serde::{Deserialize, Serialize};

use super::repo_types::UserStatus;

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// PUT body: every writable field is replaced.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// PATCH body: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct PatchUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for PatchUserRequest {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            first_name: Some(r.first_name),
            last_name: Some(r.last_name),
            email: Some(r.email),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub status: UserStatus,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub status: &'static str,
}
