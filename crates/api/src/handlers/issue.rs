//! Handlers for the `/issue` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bugtracker_core::types::DbId;
use bugtracker_db::models::issue::{CreateIssue, UpdateIssue};

use crate::error::AppResult;
use crate::middleware::auth::MaybeUser;
use crate::query::ListIssuesParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /issue
///
/// Paginated listing. Query: `page`, `category`, `sort`, `order`.
pub async fn list_issues(
    State(state): State<AppState>,
    Query(params): Query<ListIssuesParams>,
) -> AppResult<impl IntoResponse> {
    let query = params.to_query(state.config.page_size);
    let page = state.issues().list_issues(&query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /issue/options
pub async fn issue_options(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.issues().issue_options(),
    })
}

/// POST /issue
pub async fn create_issue(
    user: MaybeUser,
    State(state): State<AppState>,
    Json(input): Json<CreateIssue>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let issue = state.issues().create_issue(actor.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: issue })))
}

/// GET /issue/{id}
pub async fn get_issue(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let issue = state.issues().find_issue(actor.as_ref(), id).await?;
    Ok(Json(DataResponse { data: issue }))
}

/// POST /issue/{id}/edit
pub async fn update_issue(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIssue>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    let issue = state
        .issues()
        .update_issue(actor.as_ref(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: issue }))
}

/// POST /issue/{id}/delete
pub async fn delete_issue(
    user: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let actor = user.actor();
    state.issues().delete_issue(actor.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
