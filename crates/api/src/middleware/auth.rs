//! Bearer-token extractors.
//!
//! [`AuthUser`] rejects requests without a valid token. [`MaybeUser`] lets
//! anonymous requests through so the category and issue policies can decide
//! between 401 and 403 themselves.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bugtracker_core::error::CoreError;
use bugtracker_core::policy::Actor;
use bugtracker_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The admin behind a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Effective roles captured when the token was issued.
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, &self.roles)
    }

    fn from_token(token: &str, state: &AppState) -> Result<Self, AppError> {
        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            unauthorized("Invalid or expired token")
        })?;
        Ok(Self {
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// The token in `Authorization: Bearer <token>`, `None` if the header is absent.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| Some(token.trim()))
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(parts)?.ok_or_else(|| unauthorized("Missing Authorization header"))?;
        Self::from_token(token, state)
    }
}

/// Optional authentication.
///
/// A missing header gives `MaybeUser(None)`. A header that is present but
/// malformed or carries a bad token is still a 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthUser::actor)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => AuthUser::from_token(token, state).map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        }
    }
}
