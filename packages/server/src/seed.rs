use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::SeedConfig;
use crate::entity::{permission, role, role_permission, user};
use crate::utils::hash;

/// Permissions seeded on startup.
pub const DEFAULT_PERMISSIONS: &[&str] = &[
    "view_users",
    "edit_users",
    "delete_users",
    "view_roles",
    "edit_roles",
    "delete_roles",
    "view_permissions",
    "edit_permissions",
    "delete_permissions",
];

/// Roles seeded on startup.
pub const DEFAULT_ROLES: &[&str] = &["admin", role::DEFAULT_ROLE, OWNER_ROLE];

/// Roles granted every seeded permission.
const FULL_ACCESS_ROLES: &[&str] = &["admin", OWNER_ROLE];

pub const OWNER_ROLE: &str = "owner";

/// Populate permissions, roles, their grants and the owner account.
///
/// Safe to run on every start: existing rows are left alone.
pub async fn run(db: &DatabaseConnection, config: &SeedConfig) -> Result<(), DbErr> {
    seed_permissions(db).await?;
    seed_roles(db).await?;
    seed_grants(db).await?;
    seed_owner(db, config).await?;
    ensure_indexes(db).await;
    Ok(())
}

async fn seed_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now();
    let mut inserted = 0u32;
    for &name in DEFAULT_PERMISSIONS {
        let model = permission::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = permission::Entity::insert(model)
            .on_conflict(
                OnConflict::column(permission::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new permissions", inserted);
    }
    Ok(())
}

async fn seed_roles(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now();
    let mut inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new roles", inserted);
    }
    Ok(())
}

async fn seed_grants(db: &DatabaseConnection) -> Result<(), DbErr> {
    let roles = role::Entity::find()
        .filter(role::Column::Name.is_in(FULL_ACCESS_ROLES.iter().copied()))
        .all(db)
        .await?;
    let permissions = permission::Entity::find()
        .filter(permission::Column::Name.is_in(DEFAULT_PERMISSIONS.iter().copied()))
        .all(db)
        .await?;

    let mut inserted = 0u32;
    for r in &roles {
        for p in &permissions {
            let model = role_permission::ActiveModel {
                role_id: Set(r.id),
                permission_id: Set(p.id),
            };

            let result = role_permission::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        role_permission::Column::RoleId,
                        role_permission::Column::PermissionId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await;

            match result {
                Ok(n) if n > 0 => inserted += 1,
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e),
            }
        }
    }

    if inserted > 0 {
        info!("Seeded {} new role-permission grants", inserted);
    }
    Ok(())
}

async fn seed_owner(db: &DatabaseConnection, config: &SeedConfig) -> Result<(), DbErr> {
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq(&config.owner_username))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    let owner_role = role::Entity::find()
        .filter(role::Column::Name.eq(OWNER_ROLE))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("role '{OWNER_ROLE}'")))?;

    let password = hash::hash_password(&config.owner_password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        username: Set(config.owner_username.clone()),
        password: Set(password),
        role_id: Set(owner_role.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let result = user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(n) if n > 0 => info!(username = %config.owner_username, "Seeded owner account"),
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Indexes schema-sync does not derive from the entities.
async fn ensure_indexes(db: &DatabaseConnection) {
    // Permission deletes revoke grants by permission_id alone.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_role_permissions_permission")
        .table(role_permission::Entity)
        .col(role_permission::Column::PermissionId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index idx_role_permissions_permission exists"),
        Err(e) => tracing::warn!(
            "Failed to create index idx_role_permissions_permission: {}",
            e
        ),
    }
}
