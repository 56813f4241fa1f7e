use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{permission, role};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::permission::PermissionResponse;
use crate::models::role::{
    AssignPermissionsRequest, AssignPermissionsResponse, CreateRoleRequest,
    MAX_PERMISSIONS_PER_REQUEST, RolePermissionsData, RolePermissionsResponse, RoleResponse,
    UpdateRoleRequest, validate_optional_permission_ids, validate_role_name,
};
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
    validate_bulk_ids,
};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};
use crate::utils::rbac;

const ROLE_LIST: ListSpec<role::Column> = ListSpec {
    search: &[role::Column::Name],
    sort: &[
        ("id", role::Column::Id),
        ("name", role::Column::Name),
        ("created_at", role::Column::CreatedAt),
    ],
    default_sort: role::Column::CreatedAt,
    tie_breaker: role::Column::Id,
};

const NAME_TAKEN: &str = "Role name already exists";

#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    operation_id = "listRoles",
    summary = "List roles with their permissions",
    description = "Soft-deleted roles are excluded. Each row carries its granted permissions.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of roles", body = Paginated<RoleResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<RoleResponse>>, AppError> {
    let params = query.validate()?;
    let select = role::Entity::find().filter(role::Column::DeletedAt.is_null());
    let page = fetch_page(&state.db, select, &ROLE_LIST, &params).await?;

    let role_ids: Vec<i32> = page.data.iter().map(|r| r.id).collect();
    let mut by_role = rbac::permissions_for_roles(&state.db, &role_ids).await?;

    Ok(Json(page.map(|r| {
        let permissions = by_role.remove(&r.id).unwrap_or_default();
        RoleResponse::new(r, permissions)
    })))
}

#[utoipa::path(
    get,
    path = "/roles/getbyid",
    tag = "Roles",
    operation_id = "getRole",
    summary = "Get a role with its permissions",
    params(IdQuery),
    responses(
        (status = 200, description = "Role", body = MessageResponse<RoleResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_role(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<RoleResponse>>, AppError> {
    let id = query.require()?;
    let response = load_role_response(&state.db, id).await?;
    Ok(Json(MessageResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    operation_id = "createRole",
    summary = "Create a role",
    description = "Optionally grants `permissions` in the same transaction as the insert.",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = MessageResponse<RoleResponse>),
        (status = 400, description = "Validation error or unknown permission (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_role(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRoleRequest>,
) -> Result<Json<MessageResponse<RoleResponse>>, AppError> {
    validate_role_name(&payload.name)?;
    validate_optional_permission_ids(&payload.permissions)?;

    let txn = state.db.begin().await?;

    let now = chrono::Utc::now();
    let model = role::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, NAME_TAKEN))?;

    if !payload.permissions.is_empty() {
        rbac::replace_role_permissions(&txn, model.id, &payload.permissions).await?;
    }

    txn.commit().await?;

    info!(id = model.id, "Role created");
    let response = load_role_response(&state.db, model.id).await?;
    Ok(Json(MessageResponse::new(
        "Role created successfully",
        response,
    )))
}

#[utoipa::path(
    put,
    path = "/roles",
    tag = "Roles",
    operation_id = "updateRole",
    summary = "Update a role",
    description = "Renames the role. A non-empty `permissions` list replaces its grants in the same transaction; an empty one leaves them as they are.",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = MessageResponse<RoleResponse>),
        (status = 400, description = "Validation error or unknown permission (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id))]
pub async fn update_role(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<Json<MessageResponse<RoleResponse>>, AppError> {
    let id = require_body_id(payload.id)?;
    validate_role_name(&payload.name)?;
    validate_optional_permission_ids(&payload.permissions)?;

    let txn = state.db.begin().await?;

    let mut active: role::ActiveModel = rbac::find_role(&txn, id).await?.into();
    active.name = Set(payload.name.trim().to_string());
    active.updated_at = Set(chrono::Utc::now());
    active
        .update(&txn)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, NAME_TAKEN))?;

    if !payload.permissions.is_empty() {
        rbac::replace_role_permissions(&txn, id, &payload.permissions).await?;
    }

    txn.commit().await?;

    let response = load_role_response(&state.db, id).await?;
    Ok(Json(MessageResponse::new(
        "Role updated successfully",
        response,
    )))
}

#[utoipa::path(
    delete,
    path = "/roles",
    tag = "Roles",
    operation_id = "deleteRole",
    summary = "Soft-delete a role",
    params(IdQuery),
    responses(
        (status = 200, description = "Role deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_role(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let mut active: role::ActiveModel = rbac::find_role(&state.db, id).await?.into();
    let now = chrono::Utc::now();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(&state.db).await?;

    info!(id, "Role soft-deleted");
    Ok(Json(StatusMessage::new("Role deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/roles/permissions",
    tag = "Roles",
    operation_id = "getRolePermissions",
    summary = "Permissions of one role, or all permissions",
    description = "With `?id=` returns that role and its grants. Without it returns every permission.",
    params(IdQuery),
    responses(
        (status = 200, description = "Role permissions", body = RolePermissionsResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn role_permissions(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<RolePermissionsResponse>, AppError> {
    let has_id = query.id.as_deref().is_some_and(|s| !s.trim().is_empty());

    if has_id {
        let id = query.require()?;
        let role = load_role_response(&state.db, id).await?;
        return Ok(Json(RolePermissionsResponse {
            status: "success",
            message: "Role permissions retrieved successfully".into(),
            data: RolePermissionsData::Role(role),
        }));
    }

    let all = permission::Entity::find()
        .order_by_asc(permission::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(RolePermissionsResponse {
        status: "success",
        message: "Permissions retrieved successfully".into(),
        data: RolePermissionsData::All(all.into_iter().map(PermissionResponse::from).collect()),
    }))
}

#[utoipa::path(
    put,
    path = "/roles/assign",
    tag = "Roles",
    operation_id = "assignRolePermissions",
    summary = "Replace a role's permissions",
    description = "Deletes every grant of the role and inserts the given set in one transaction. If any permission id is unknown nothing changes.",
    request_body = AssignPermissionsRequest,
    responses(
        (status = 200, description = "Permissions assigned", body = MessageResponse<AssignPermissionsResponse>),
        (status = 400, description = "Missing id, empty or duplicate list, or unknown permission (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Role not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id, count = payload.permissions.len()))]
pub async fn assign_permissions(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignPermissionsRequest>,
) -> Result<Json<MessageResponse<AssignPermissionsResponse>>, AppError> {
    let role_id = require_body_id(payload.id)?;
    validate_bulk_ids(
        &payload.permissions,
        "permissions",
        MAX_PERMISSIONS_PER_REQUEST,
    )?;

    let txn = state.db.begin().await?;
    rbac::find_role(&txn, role_id).await?;
    rbac::replace_role_permissions(&txn, role_id, &payload.permissions).await?;
    txn.commit().await?;

    info!(role_id, "Role permissions replaced");
    Ok(Json(MessageResponse::new(
        "Permissions assigned successfully",
        AssignPermissionsResponse {
            role_id,
            permission_ids: payload.permissions,
        },
    )))
}

async fn load_role_response<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<RoleResponse, AppError> {
    let role = rbac::find_role(db, id).await?;
    let permissions = rbac::permissions_for_role(db, id).await?;
    Ok(RoleResponse::new(role, permissions))
}
