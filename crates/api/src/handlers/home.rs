//! Handler for the dashboard at `/`.

use axum::extract::{Query, State};
use axum::Json;
use bugtracker_core::listing::SortDirection;
use bugtracker_core::types::DbId;
use bugtracker_db::models::category::Category;
use bugtracker_db::models::issue::Issue;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::ListIssuesParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the dashboard renders in one payload.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub issues: Vec<Issue>,
    pub categories: Vec<Category>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_issues: i64,
    pub selected_category: Option<DbId>,
    pub sort_by: &'static str,
    pub sort_order: SortDirection,
}

/// GET /
///
/// One page of issues (filtered and sorted per the query string) together
/// with every category for the filter sidebar.
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListIssuesParams>,
) -> AppResult<Json<DataResponse<HomeResponse>>> {
    let query = params.to_query(state.config.page_size);
    let page = state.issues().list_issues(&query).await?;
    let categories = state.categories().list_categories().await?;

    Ok(Json(DataResponse {
        data: HomeResponse {
            issues: page.items,
            categories,
            current_page: page.page,
            total_pages: page.total_pages,
            total_issues: page.total,
            selected_category: query.category_id,
            sort_by: query.sort.field.as_param(),
            sort_order: query.sort.direction,
        },
    }))
}
