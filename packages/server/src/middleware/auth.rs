use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::utils::jwt::{self, TokenKind};

/// Validate `Authorization: Bearer <access token>` and attach the caller's id
/// to the request as an [`AuthUser`] extension.
///
/// Refresh tokens are signed with a different secret and are rejected here.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::TokenInvalid)?;

    let claims = jwt::verify(token, TokenKind::Access, &state.config.auth).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        AppError::TokenInvalid
    })?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.user_id,
    });

    Ok(next.run(request).await)
}
