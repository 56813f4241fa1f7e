use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{permission, role_permission};
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::permission::{
    PermissionRequest, PermissionResponse, UpdatePermissionRequest, validate_permission_name,
};
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};

const PERMISSION_LIST: ListSpec<permission::Column> = ListSpec {
    search: &[permission::Column::Name],
    sort: &[
        ("id", permission::Column::Id),
        ("name", permission::Column::Name),
        ("created_at", permission::Column::CreatedAt),
    ],
    default_sort: permission::Column::CreatedAt,
    tie_breaker: permission::Column::Id,
};

const NAME_TAKEN: &str = "Permission name already exists";

#[utoipa::path(
    get,
    path = "/permissions",
    tag = "Permissions",
    operation_id = "listPermissions",
    summary = "List permissions",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of permissions", body = Paginated<PermissionResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_permissions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<PermissionResponse>>, AppError> {
    let params = query.validate()?;
    let page = fetch_page(
        &state.db,
        permission::Entity::find(),
        &PERMISSION_LIST,
        &params,
    )
    .await?;
    Ok(Json(page.map(PermissionResponse::from)))
}

#[utoipa::path(
    get,
    path = "/permissions/getbyid",
    tag = "Permissions",
    operation_id = "getPermission",
    summary = "Get a permission by ID",
    params(IdQuery),
    responses(
        (status = 200, description = "Permission", body = MessageResponse<PermissionResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_permission(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<PermissionResponse>>, AppError> {
    let id = query.require()?;
    let model = find_permission(&state.db, id).await?;
    Ok(Json(MessageResponse::success(model.into())))
}

#[utoipa::path(
    post,
    path = "/permissions/create",
    tag = "Permissions",
    operation_id = "createPermission",
    summary = "Create a permission",
    request_body = PermissionRequest,
    responses(
        (status = 200, description = "Permission created", body = MessageResponse<PermissionResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_permission(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PermissionRequest>,
) -> Result<Json<MessageResponse<PermissionResponse>>, AppError> {
    validate_permission_name(&payload.name)?;

    let model = permission::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, NAME_TAKEN))?;

    info!(id = model.id, "Permission created");
    Ok(Json(MessageResponse::new(
        "Permission created successfully",
        model.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/permissions/update",
    tag = "Permissions",
    operation_id = "updatePermission",
    summary = "Rename a permission",
    request_body = UpdatePermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = MessageResponse<PermissionResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id))]
pub async fn update_permission(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdatePermissionRequest>,
) -> Result<Json<MessageResponse<PermissionResponse>>, AppError> {
    let id = require_body_id(payload.id)?;
    validate_permission_name(&payload.name)?;

    let mut active: permission::ActiveModel = find_permission(&state.db, id).await?.into();
    active.name = Set(payload.name.trim().to_string());
    let model = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, NAME_TAKEN))?;

    Ok(Json(MessageResponse::new(
        "Permission updated successfully",
        model.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/permissions/delete",
    tag = "Permissions",
    operation_id = "deletePermission",
    summary = "Delete a permission",
    description = "Revokes the permission from every role, then deletes it, in one transaction.",
    params(IdQuery),
    responses(
        (status = 200, description = "Permission deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_permission(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let txn = state.db.begin().await?;

    role_permission::Entity::delete_many()
        .filter(role_permission::Column::PermissionId.eq(id))
        .exec(&txn)
        .await?;

    let result = permission::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::NotFound("Permission not found".into()));
    }

    txn.commit().await?;

    info!(id, "Permission deleted");
    Ok(Json(StatusMessage::new("Permission deleted successfully")))
}

async fn find_permission<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<permission::Model, AppError> {
    permission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Permission not found".into()))
}
