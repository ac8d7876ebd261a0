//! HTTP-level integration tests for the `/category` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_auth, post_empty, post_json, post_json_auth};
use serde_json::json;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_public_and_ordered_by_name() {
    let app = common::build_test_app();
    app.create_category("Performance").await;
    app.create_category("Bug").await;
    app.create_category("Feature Request").await;

    let response = get(app.app(), "/category").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bug", "Feature Request", "Performance"]);
}

#[tokio::test]
async fn choices_return_id_and_name_only() {
    let app = common::build_test_app();
    let bug = app.create_category("Bug").await;

    let json = body_json(get(app.app(), "/category/choices").await).await;
    assert_eq!(json["data"][0]["id"], bug.id);
    assert_eq!(json["data"][0]["name"], "Bug");
    assert!(json["data"][0].get("description").is_none());
}

#[tokio::test]
async fn get_missing_category_returns_404() {
    let app = common::build_test_app();
    let response = get(app.app(), "/category/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Category with id 999 not found");
}

// ---------------------------------------------------------------------------
// Create / edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_creates_category() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let body = json!({ "name": "Security", "description": "Vulnerabilities" });
    let response = post_json_auth(app.app(), "/category", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Security");
    assert_eq!(json["data"]["description"], "Vulnerabilities");
    assert!(json["data"]["id"].is_number());
}

#[tokio::test]
async fn anonymous_create_is_unauthorized() {
    let app = common::build_test_app();
    let response = post_json(app.app(), "/category", json!({ "name": "Security" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_create_is_forbidden() {
    let app = common::build_test_app();
    let token = app.user_token().await;

    let response =
        post_json_auth(app.app(), "/category", json!({ "name": "Security" }), &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "You do not have permission to create categories.");
}

#[tokio::test]
async fn short_name_is_rejected_with_field_message() {
    let app = common::build_test_app();
    let token = app.admin_token().await;

    let response = post_json_auth(app.app(), "/category", json!({ "name": "X" }), &token).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "name");
    assert_eq!(
        json["fields"][0]["message"],
        "Category name must be at least 2 characters long."
    );
}

#[tokio::test]
async fn edit_merges_omitted_fields() {
    let app = common::build_test_app();
    let token = app.admin_token().await;
    let created = body_json(
        post_json_auth(
            app.app(),
            "/category",
            json!({ "name": "UI", "description": "Layout problems" }),
            &token,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.app(),
        &format!("/category/{id}/edit"),
        json!({ "name": "UI/UX" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "UI/UX");
    assert_eq!(json["data"]["description"], "Layout problems");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_category_is_deleted() {
    let app = common::build_test_app();
    let token = app.admin_token().await;
    let category = app.create_category("Temporary").await;

    let response = post_auth(app.app(), &format!("/category/{}/delete", category.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.app(), &format!("/category/{}", category.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_with_issues_cannot_be_deleted() {
    let app = common::build_test_app();
    let token = app.admin_token().await;
    let category = app.create_category("Security").await;
    app.create_issue("SQL injection in search", "high", category.id).await;

    let response = post_auth(app.app(), &format!("/category/{}/delete", category.id), &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTEGRITY_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("\"Security\""), "got: {message}");
    assert!(message.contains("1 associated issue(s)"), "got: {message}");

    let response = get(app.app(), &format!("/category/{}", category.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn anonymous_delete_is_unauthorized() {
    let app = common::build_test_app();
    let category = app.create_category("Temporary").await;

    let response = post_empty(app.app(), &format!("/category/{}/delete", category.id)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_token_is_rejected_even_on_policy_routes() {
    let app = common::build_test_app();
    let category = app.create_category("Temporary").await;

    let response = post_auth(
        app.app(),
        &format!("/category/{}/delete", category.id),
        "not-a-jwt",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
