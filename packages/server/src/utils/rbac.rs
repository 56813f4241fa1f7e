use std::collections::HashMap;

use sea_orm::*;

use crate::entity::{permission, role, role_permission, user};
use crate::error::AppError;

/// Permissions granted to one role, ordered by id.
pub async fn permissions_for_role<C: ConnectionTrait>(
    db: &C,
    role_id: i32,
) -> Result<Vec<permission::Model>, DbErr> {
    let mut by_role = permissions_for_roles(db, &[role_id]).await?;
    Ok(by_role.remove(&role_id).unwrap_or_default())
}

/// Permissions for a batch of roles in two queries, keyed by role id.
pub async fn permissions_for_roles<C: ConnectionTrait>(
    db: &C,
    role_ids: &[i32],
) -> Result<HashMap<i32, Vec<permission::Model>>, DbErr> {
    if role_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let grants = role_permission::Entity::find()
        .filter(role_permission::Column::RoleId.is_in(role_ids.iter().copied()))
        .all(db)
        .await?;

    let permission_ids: Vec<i32> = grants.iter().map(|g| g.permission_id).collect();
    let permissions: HashMap<i32, permission::Model> = if permission_ids.is_empty() {
        HashMap::new()
    } else {
        permission::Entity::find()
            .filter(permission::Column::Id.is_in(permission_ids))
            .order_by_asc(permission::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };

    let mut by_role: HashMap<i32, Vec<permission::Model>> = HashMap::new();
    for grant in grants {
        if let Some(p) = permissions.get(&grant.permission_id) {
            by_role.entry(grant.role_id).or_default().push(p.clone());
        }
    }
    for list in by_role.values_mut() {
        list.sort_by_key(|p| p.id);
    }
    Ok(by_role)
}

/// Look up a live (not soft-deleted) role.
pub async fn find_role<C: ConnectionTrait>(db: &C, id: i32) -> Result<role::Model, AppError> {
    role::Entity::find_by_id(id)
        .filter(role::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found".into()))
}

/// Look up a live (not soft-deleted) user.
pub async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .filter(user::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// The role of `user` and its permission names. A soft-deleted role grants nothing.
pub async fn role_and_permission_names<C: ConnectionTrait>(
    db: &C,
    user: &user::Model,
) -> Result<(Option<role::Model>, Vec<String>), DbErr> {
    let role = role::Entity::find_by_id(user.role_id)
        .filter(role::Column::DeletedAt.is_null())
        .one(db)
        .await?;

    let names = match &role {
        Some(r) => permissions_for_role(db, r.id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect(),
        None => Vec::new(),
    };
    Ok((role, names))
}

/// Replace every grant of `role_id` with `permission_ids`.
///
/// Must run inside the caller's transaction: on any error the caller drops the
/// transaction and the previous grants survive untouched.
pub async fn replace_role_permissions(
    txn: &DatabaseTransaction,
    role_id: i32,
    permission_ids: &[i32],
) -> Result<(), AppError> {
    role_permission::Entity::delete_many()
        .filter(role_permission::Column::RoleId.eq(role_id))
        .exec(txn)
        .await?;

    for &pid in permission_ids {
        let grant = role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(pid),
        };
        role_permission::Entity::insert(grant)
            .exec_without_returning(txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::Validation(format!("Permission {pid} does not exist"))
                }
                _ => AppError::Internal(format!("Failed to assign permission ID {pid}: {e}")),
            })?;
    }

    Ok(())
}
