//! Route definitions for issues.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::issue;
use crate::state::AppState;

/// Issue routes mounted at `/issue`.
///
/// ```text
/// GET    /               -> list_issues
/// POST   /               -> create_issue
/// GET    /options        -> issue_options
/// GET    /{id}           -> get_issue
/// POST   /{id}/edit      -> update_issue
/// POST   /{id}/delete    -> delete_issue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issue::list_issues).post(issue::create_issue))
        .route("/options", get(issue::issue_options))
        .route("/{id}", get(issue::get_issue))
        .route("/{id}/edit", post(issue::update_issue))
        .route("/{id}/delete", post(issue::delete_issue))
}
