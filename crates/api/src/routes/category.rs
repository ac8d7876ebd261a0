//! Route definitions for categories.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Category routes mounted at `/category`.
///
/// ```text
/// GET    /               -> list_categories
/// POST   /               -> create_category
/// GET    /choices        -> category_choices
/// GET    /{id}           -> get_category
/// POST   /{id}/edit      -> update_category
/// POST   /{id}/delete    -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_categories).post(category::create_category),
        )
        .route("/choices", get(category::category_choices))
        .route("/{id}", get(category::get_category))
        .route("/{id}/edit", post(category::update_category))
        .route("/{id}/delete", post(category::delete_category))
}
