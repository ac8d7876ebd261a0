//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use bugtracker_db::models::admin_user::AdminUserResponse;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::account::LoginResponse;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .accounts()
        .login(&input.email, &input.password, &state.config.jwt)
        .await?;
    Ok(Json(response))
}

/// GET /auth/me
///
/// The admin behind the bearer token.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AdminUserResponse>>> {
    let user = state.accounts().profile(auth.user_id).await?;
    Ok(Json(DataResponse {
        data: AdminUserResponse::from(&user),
    }))
}
