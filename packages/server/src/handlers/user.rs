use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{role, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
};
use crate::models::user::{UpdateUserRequest, UserResponse, validate_update_user};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};
use crate::utils::rbac;

const USER_LIST: ListSpec<user::Column> = ListSpec {
    search: &[user::Column::Username],
    sort: &[
        ("id", user::Column::Id),
        ("username", user::Column::Username),
        ("created_at", user::Column::CreatedAt),
    ],
    default_sort: user::Column::CreatedAt,
    tie_breaker: user::Column::Id,
};

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users",
    description = "Requires `view_users`. Soft-deleted accounts are excluded.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of users", body = Paginated<UserResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<UserResponse>>, AppError> {
    auth_user.require_permission(&state.db, "view_users").await?;
    let params = query.validate()?;

    let select = user::Entity::find().filter(user::Column::DeletedAt.is_null());
    let page = fetch_page(&state.db, select, &USER_LIST, &params).await?;

    let role_ids: Vec<i32> = page.data.iter().map(|u| u.role_id).collect();
    let names = role_names(&state.db, role_ids).await?;

    Ok(Json(page.map(|u| {
        let role = names.get(&u.role_id).cloned();
        UserResponse::new(u, role)
    })))
}

#[utoipa::path(
    get,
    path = "/users/getbyid",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    description = "Requires `view_users`.",
    params(IdQuery),
    responses(
        (status = 200, description = "User", body = MessageResponse<UserResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<UserResponse>>, AppError> {
    auth_user.require_permission(&state.db, "view_users").await?;
    let id = query.require()?;

    let user = rbac::find_user(&state.db, id).await?;
    let role = role_names(&state.db, vec![user.role_id])
        .await?
        .remove(&user.role_id);
    Ok(Json(MessageResponse::success(UserResponse::new(user, role))))
}

#[utoipa::path(
    put,
    path = "/users/update",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Change a user's username or role",
    description = "Requires `edit_users`. The target role must exist.",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse<UserResponse>),
        (status = 400, description = "Validation error or unknown role (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Username taken (USERNAME_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, target = ?payload.id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse<UserResponse>>, AppError> {
    auth_user.require_permission(&state.db, "edit_users").await?;
    let id = require_body_id(payload.id)?;
    validate_update_user(&payload)?;

    let role = rbac::find_role(&state.db, payload.role_id)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::Validation(format!("Role {} does not exist", payload.role_id))
            }
            other => other,
        })?;

    let mut active: user::ActiveModel = rbac::find_user(&state.db, id).await?.into();
    active.username = Set(payload.username.trim().to_string());
    active.role_id = Set(role.id);
    active.updated_at = Set(chrono::Utc::now());
    let user = active.update(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UsernameTaken,
        _ => AppError::from(e),
    })?;

    Ok(Json(MessageResponse::new(
        "User updated successfully",
        UserResponse::new(user, Some(role.name)),
    )))
}

#[utoipa::path(
    delete,
    path = "/users/delete",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Soft-delete a user",
    description = "Requires `delete_users`. The account can no longer log in or use its tokens.",
    params(IdQuery),
    responses(
        (status = 200, description = "User deleted", body = StatusMessage),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = auth_user.user_id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    auth_user.require_permission(&state.db, "delete_users").await?;
    let id = query.require()?;

    let mut active: user::ActiveModel = rbac::find_user(&state.db, id).await?.into();
    let now = chrono::Utc::now();
    active.deleted_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(&state.db).await?;

    info!(id, "User soft-deleted");
    Ok(Json(StatusMessage::new("User deleted successfully")))
}

/// Names of the live roles among `ids`.
async fn role_names<C: ConnectionTrait>(
    db: &C,
    mut ids: Vec<i32>,
) -> Result<HashMap<i32, String>, DbErr> {
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let roles = role::Entity::find()
        .filter(role::Column::Id.is_in(ids))
        .filter(role::Column::DeletedAt.is_null())
        .all(db)
        .await?;
    Ok(roles.into_iter().map(|r| (r.id, r.name)).collect())
}
