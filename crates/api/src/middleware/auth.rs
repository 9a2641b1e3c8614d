//! Bearer-token authentication for handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use liftcycle_core::error::CoreError;
use liftcycle_core::roles::Role;
use liftcycle_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The lifter making the request.
///
/// ```ignore
/// async fn current_workout(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::debug!(user_id = %user.user_id, role = %user.role, "serving workout");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Maxes and sessions are private: only their owner (or an admin) may
    /// change them.
    pub fn require_owner_or_admin(&self, owner_id: DbId) -> Result<(), AppError> {
        if self.user_id == owner_id || self.is_admin() {
            return Ok(());
        }
        Err(CoreError::Forbidden("You do not have access to this resource".into()).into())
    }
}

fn unauthorized(message: &str) -> AppError {
    CoreError::Unauthorized(message.to_string()).into()
}

/// The raw token from `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: Role::from_str(&claims.role)?,
        })
    }
}
