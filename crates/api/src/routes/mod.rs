pub mod admin;
pub mod auth;
pub mod category;
pub mod health;
pub mod issue;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree (everything except `/health`).
///
/// Route hierarchy:
///
/// ```text
/// /                                   dashboard: issue page + categories (public)
///
/// /auth/login                         login (public)
/// /auth/me                            current admin (requires auth)
///
/// /category                           list (public), create (admin)
/// /category/choices                   id/name pairs for the issue form (public)
/// /category/{id}                      get (public)
/// /category/{id}/edit                 update (admin)
/// /category/{id}/delete               delete (admin, only when empty)
///
/// /issue                              paginated list (public), create (admin)
/// /issue/options                      status/priority choices (public)
/// /issue/{id}                         get (public)
/// /issue/{id}/edit                    update (admin, or author when allowed)
/// /issue/{id}/delete                  delete (admin, or author when allowed)
///
/// /admin/profile                      show own profile (admin)
/// /admin/profile/edit                 update names (admin)
/// /admin/profile/password             change password (admin)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::index))
        .nest("/auth", auth::router())
        .nest("/category", category::router())
        .nest("/issue", issue::router())
        .nest("/admin", admin::router())
}
