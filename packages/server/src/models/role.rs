use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{permission, role};
use crate::error::AppError;

use super::permission::PermissionResponse;
use super::shared::{validate_bulk_ids, validate_name};

/// Upper bound on permission ids accepted in one request.
pub const MAX_PERMISSIONS_PER_REQUEST: usize = 500;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRoleRequest {
    #[schema(example = "editor")]
    pub name: String,
    /// Permission ids granted to the new role.
    #[serde(default)]
    #[schema(example = json!([1, 2]))]
    pub permissions: Vec<i32>,
}

/// Role update. An empty `permissions` list keeps the current grants.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    #[schema(example = 2)]
    pub id: Option<i32>,
    #[schema(example = "editor")]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<i32>,
}

/// Replace the full permission set of a role.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignPermissionsRequest {
    #[schema(example = 2)]
    pub id: Option<i32>,
    #[serde(default)]
    #[schema(example = json!([1, 4, 7]))]
    pub permissions: Vec<i32>,
}

pub fn validate_role_name(name: &str) -> Result<(), AppError> {
    validate_name("Role name", name)
}

/// Optional id lists (create/update) only need checking when non-empty.
pub fn validate_optional_permission_ids(ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    validate_bulk_ids(ids, "permissions", MAX_PERMISSIONS_PER_REQUEST)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    pub id: i32,
    #[schema(example = "admin")]
    pub name: String,
    pub permissions: Vec<PermissionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoleResponse {
    pub fn new(role: role::Model, permissions: Vec<permission::Model>) -> Self {
        Self {
            id: role.id,
            name: role.name,
            permissions: permissions.into_iter().map(Into::into).collect(),
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AssignPermissionsResponse {
    #[schema(example = 2)]
    pub role_id: i32,
    #[schema(example = json!([1, 4, 7]))]
    pub permission_ids: Vec<i32>,
}

/// Payload of `GET /roles/permissions`: one role with its grants, or every permission.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum RolePermissionsData {
    Role(RoleResponse),
    All(Vec<PermissionResponse>),
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RolePermissionsResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub message: String,
    pub data: RolePermissionsData,
}
