//! Shared helpers for API integration tests.
//!
//! Every test builds the production router over an in-memory store, so the
//! suite runs without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bugtracker_api::auth::jwt::{generate_access_token, JwtConfig};
use bugtracker_api::config::ServerConfig;
use bugtracker_api::router::build_app_router;
use bugtracker_api::services::AccountService;
use bugtracker_api::state::AppState;
use bugtracker_core::roles::ROLE_ADMIN;
use bugtracker_core::types::DbId;
use bugtracker_core::validation::{check_category, check_issue, IssueDraft};
use bugtracker_db::models::category::Category;
use bugtracker_db::models::issue::Issue;
use bugtracker_db::{CategoryStore, IssueStore, MemoryStore, Store};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const USER_EMAIL: &str = "user@test.com";
pub const PASSWORD: &str = "test_password_123";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        page_size: 10,
        issue_edit_admin_only: true,
        seed_demo_data: false,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".into(),
            access_token_expiry_mins: 15,
        },
    }
}

/// An app plus direct access to its backing store for arranging fixtures.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
}

impl TestApp {
    /// A fresh router. `oneshot` consumes the router, so take one per request.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Provision an account and return a bearer token for it.
    pub async fn token_for(&self, email: &str, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        let user = AccountService::new(Arc::clone(&self.store))
            .provision_admin(email, PASSWORD, roles)
            .await
            .expect("provisioning should succeed");
        generate_access_token(user.id, &user.effective_roles(), &self.config.jwt)
            .expect("token generation should succeed")
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(ADMIN_EMAIL, &[ROLE_ADMIN]).await
    }

    /// A signed-in account without the admin role.
    pub async fn user_token(&self) -> String {
        self.token_for(USER_EMAIL, &[]).await
    }

    pub async fn create_category(&self, name: &str) -> Category {
        let checked = check_category(name, None).expect("valid category");
        self.store
            .create_category(&checked)
            .await
            .expect("category creation should succeed")
    }

    pub async fn create_issue(&self, title: &str, priority: &str, category_id: DbId) -> Issue {
        self.insert_issue(title, priority, category_id, None).await
    }

    pub async fn create_issue_by(
        &self,
        title: &str,
        category_id: DbId,
        author_id: Option<DbId>,
    ) -> Issue {
        self.insert_issue(title, "medium", category_id, author_id)
            .await
    }

    async fn insert_issue(
        &self,
        title: &str,
        priority: &str,
        category_id: DbId,
        author_id: Option<DbId>,
    ) -> Issue {
        let draft = IssueDraft {
            title,
            description: "Steps to reproduce are attached.",
            status: Some("open"),
            priority: Some(priority),
            category_id: Some(category_id),
        };
        let checked = check_issue(&draft, true).expect("valid issue");
        self.store
            .create_issue(&checked, author_id)
            .await
            .expect("issue creation should succeed")
    }
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let state = AppState::new(Arc::clone(&store), config.clone());
    TestApp {
        router: build_app_router(state, &config),
        store,
        config,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// A body-less POST, used by the `/delete` routes.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
