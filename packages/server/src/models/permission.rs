use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct PermissionRequest {
    #[schema(example = "view_reports")]
    pub name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdatePermissionRequest {
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[schema(example = "view_reports")]
    pub name: String,
}

pub fn validate_permission_name(name: &str) -> Result<(), AppError> {
    validate_name("Permission name", name)
}

#[derive(Serialize, Clone, utoipa::ToSchema)]
pub struct PermissionResponse {
    pub id: i32,
    #[schema(example = "view_users")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::permission::Model> for PermissionResponse {
    fn from(m: crate::entity::permission::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}
