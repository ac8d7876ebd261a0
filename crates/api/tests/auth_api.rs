//! HTTP-level integration tests for login, the current-admin endpoint and
//! profile self-service.

mod common;

use axum::http::StatusCode;
use bugtracker_db::AdminUserStore;
use common::{
    body_json, get, get_auth, post_json, post_json_auth, ADMIN_EMAIL, PASSWORD, USER_EMAIL,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn login(app: axum::Router, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = common::build_test_app();
    app.admin_token().await;

    let response = login(app.app(), ADMIN_EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert_eq!(json["user"]["roles"], json!(["admin", "user"]));
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = common::build_test_app();
    app.admin_token().await;

    let wrong = login(app.app(), ADMIN_EMAIL, "incorrect").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;

    let unknown = login(app.app(), "ghost@test.com", PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(unknown).await;

    assert_eq!(wrong["error"], unknown["error"]);
    assert_eq!(wrong["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_token_authenticates_me() {
    let app = common::build_test_app();
    app.admin_token().await;

    let login_json = body_json(login(app.app(), ADMIN_EMAIL, PASSWORD).await).await;
    let token = login_json["access_token"].as_str().unwrap();

    let response = get_auth(app.app(), "/auth/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], ADMIN_EMAIL);
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let app = common::build_test_app();
    let response = get(app.app(), "/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing Authorization header");
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_requires_admin_role() {
    let app = common::build_test_app();
    let token = app.user_token().await;

    let response = get_auth(app.app(), "/admin/profile", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_falls_back_to_email_for_full_name() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let json = body_json(get_auth(app.app(), "/admin/profile", &token).await).await;
    assert_eq!(json["data"]["full_name"], ADMIN_EMAIL);
}

#[tokio::test]
async fn edit_profile_updates_names() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(
        app.app(),
        "/admin/profile/edit",
        json!({ "first_name": "Ada", "last_name": "Lovelace" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["first_name"], "Ada");
    assert_eq!(json["data"]["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn change_password_then_login_with_new_one() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(
        app.app(),
        "/admin/profile/password",
        json!({
            "current_password": PASSWORD,
            "new_password": "brand-new-secret",
            "confirm_password": "brand-new-secret",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let old = login(app.app(), ADMIN_EMAIL, PASSWORD).await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);
    let new = login(app.app(), ADMIN_EMAIL, "brand-new-secret").await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn change_password_reports_all_problems() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(
        app.app(),
        "/admin/profile/password",
        json!({
            "current_password": "not-my-password",
            "new_password": "abc",
            "confirm_password": "xyz",
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"new_password"));
    assert!(fields.contains(&"current_password"));
    let current = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["field"] == "current_password")
        .unwrap();
    assert_eq!(
        current["message"],
        "Current password is incorrect. Please try again."
    );
}

// ---------------------------------------------------------------------------
// Author edits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn author_may_edit_own_issue_when_allowed() {
    let mut config = common::test_config();
    config.issue_edit_admin_only = false;
    let app = common::build_test_app_with(config);

    let author = app.user_token().await;
    let author_id = app
        .store
        .find_admin_user_by_email(USER_EMAIL)
        .await
        .unwrap()
        .unwrap()
        .id;
    let category = app.create_category("Bug").await;
    let own = app
        .create_issue_by("Reported by the author", category.id, Some(author_id))
        .await;
    let other = app
        .create_issue_by("Reported by someone else", category.id, None)
        .await;

    let response = post_json_auth(
        app.app(),
        &format!("/issue/{}/edit", own.id),
        json!({ "status": "closed" }),
        &author,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app.app(),
        &format!("/issue/{}/edit", other.id),
        json!({ "status": "closed" }),
        &author,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn author_edits_are_refused_by_default() {
    let app = common::build_test_app();

    let author = app.user_token().await;
    let author_id = app
        .store
        .find_admin_user_by_email(USER_EMAIL)
        .await
        .unwrap()
        .unwrap()
        .id;
    let category = app.create_category("Bug").await;
    let own = app
        .create_issue_by("Reported by the author", category.id, Some(author_id))
        .await;

    let response = post_json_auth(
        app.app(),
        &format!("/issue/{}/delete", own.id),
        json!({}),
        &author,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
