use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Admin self-service routes mounted at `/admin`.
///
/// ```text
/// GET  /profile            -> show_profile
/// POST /profile/edit       -> edit_profile
/// POST /profile/password   -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile::show_profile))
        .route("/profile/edit", post(profile::edit_profile))
        .route("/profile/password", post(profile::change_password))
}
