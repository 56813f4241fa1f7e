use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;

use super::auth::validate_username;

/// Admin update of an account. The password is not editable here.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = 7)]
    pub id: Option<i32>,
    #[schema(example = "alice_wonder")]
    pub username: String,
    #[schema(example = 2)]
    pub role_id: i32,
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), AppError> {
    validate_username(&req.username)?;
    if req.role_id <= 0 {
        return Err(AppError::Validation("Invalid role ID".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    #[schema(example = "alice_wonder")]
    pub username: String,
    pub role_id: i32,
    /// Role name, absent if the role has been deleted.
    #[schema(example = "user")]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: user::Model, role: Option<String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role_id: user.role_id,
            role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
