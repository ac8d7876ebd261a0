//! Handlers for the signed-in admin's own profile. All require the admin role.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bugtracker_db::models::admin_user::{AdminUserResponse, ChangePassword, UpdateProfile};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /admin/profile
pub async fn show_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let user = state.accounts().profile(admin.user_id).await?;
    Ok(Json(DataResponse {
        data: AdminUserResponse::from(&user),
    }))
}

/// POST /admin/profile/edit
pub async fn edit_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .accounts()
        .update_profile(admin.user_id, &input)
        .await?;
    Ok(Json(DataResponse {
        data: AdminUserResponse::from(&user),
    }))
}

/// POST /admin/profile/password
pub async fn change_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ChangePassword>,
) -> AppResult<impl IntoResponse> {
    state
        .accounts()
        .change_password(admin.user_id, &input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
