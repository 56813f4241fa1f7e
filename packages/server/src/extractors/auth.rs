use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::DatabaseConnection;

use crate::entity::user;
use crate::error::AppError;
use crate::utils::rbac;

/// Identity placed in the request extensions by
/// [`require_access_token`](crate::middleware::auth::require_access_token).
///
/// Add this as a handler parameter on routes behind that middleware.
/// Permission checks happen via `require_permission()` in the handler body.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
}

impl AuthUser {
    /// Load the live account behind the token. A deleted account no longer authenticates.
    pub async fn load(&self, db: &DatabaseConnection) -> Result<user::Model, AppError> {
        rbac::find_user(db, self.user_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::TokenInvalid,
                other => other,
            })
    }

    /// Returns `Ok(())` if the user's role grants `permission`, `Err(PermissionDenied)` otherwise.
    pub async fn require_permission(
        &self,
        db: &DatabaseConnection,
        permission: &str,
    ) -> Result<(), AppError> {
        let user = self.load(db).await?;
        let (_, names) = rbac::role_and_permission_names(db, &user).await?;
        if names.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::TokenMissing)
    }
}
