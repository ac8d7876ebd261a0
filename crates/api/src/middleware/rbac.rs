//! Role gates for routes that are admin-only regardless of the resource.
//!
//! Category and issue routes do not use these: their rules depend on the
//! subject and live in `bugtracker_core::policy`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bugtracker_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// A signed-in admin. Other signed-in users get 403, anonymous callers 401.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.actor().is_admin() {
            tracing::debug!(user_id = user.user_id, "Admin route refused");
            return Err(CoreError::Forbidden(
                "You must be an administrator to access this page.".into(),
            )
            .into());
        }
        Ok(Self(user))
    }
}
