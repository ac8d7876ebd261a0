//! Handlers for the `/category` resource.
//!
//! Reads are public. Mutations accept an optional bearer token and leave the
//! access decision to the category policy.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bugtracker_core::types::DbId;
use bugtracker_db::models::category::{CreateCategory, UpdateCategory};

use crate::error::AppResult;
use crate::middleware::auth::MaybeUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /category
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.categories().list_categories().await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /category/choices
///
/// `(id, name)` pairs for the issue form's category select.
pub async fn category_choices(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let choices = state.categories().category_choices().await?;
    Ok(Json(DataResponse { data: choices }))
}

/// POST /category
pub async fn create_category(
    user: MaybeUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let category = state
        .categories()
        .create_category(actor.as_ref(), &input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /category/{id}
pub async fn get_category(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let category = state.categories().find_category(actor.as_ref(), id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /category/{id}/edit
pub async fn update_category(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let category = state
        .categories()
        .update_category(actor.as_ref(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /category/{id}/delete
///
/// Refused with 409 while the category still owns issues.
pub async fn delete_category(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    state.categories().delete_category(actor.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
