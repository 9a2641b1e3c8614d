//! Role gates layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use liftcycle_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A caller allowed to author shared program content (prescriptions,
/// progression rules and their links). Anyone else gets 403.
///
/// ```ignore
/// async fn create_progression(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.can_author() {
            tracing::debug!(user_id = %user.user_id, role = %user.role, "Authoring denied");
            return Err(CoreError::Forbidden("Admin role required".into()).into());
        }
        Ok(RequireAdmin(user))
    }
}

/// Any signed-in lifter. Used by the enrollment routes, where every action
/// is on the caller's own state.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state)
            .await
            .map(RequireAuth)
    }
}
