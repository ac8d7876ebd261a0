//! Storage traits consumed by the service layer.
//!
//! Services hold an `Arc<dyn Store>`, so the same code runs against
//! [`PgStore`] in production and [`MemoryStore`](crate::MemoryStore) in
//! tests. Every method is a single atomic operation.

use async_trait::async_trait;
use bugtracker_core::listing::IssueListQuery;
use bugtracker_core::types::DbId;
use bugtracker_core::validation::{CheckedCategory, CheckedIssue, CheckedProfile};

use crate::models::admin_user::{AdminUser, CreateAdminUser};
use crate::models::category::{Category, CategoryChoice};
use crate::models::issue::Issue;
use crate::repositories::{AdminUserRepo, CategoryRepo, IssueRepo};
use crate::DbPool;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, sqlx::Error>;
    async fn category_choices(&self) -> Result<Vec<CategoryChoice>, sqlx::Error>;
    async fn find_category(&self, id: DbId) -> Result<Option<Category>, sqlx::Error>;
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, sqlx::Error>;
    async fn category_exists(&self, id: DbId) -> Result<bool, sqlx::Error>;
    async fn create_category(&self, input: &CheckedCategory) -> Result<Category, sqlx::Error>;
    async fn update_category(
        &self,
        id: DbId,
        input: &CheckedCategory,
    ) -> Result<Option<Category>, sqlx::Error>;
    async fn count_category_issues(&self, id: DbId) -> Result<i64, sqlx::Error>;
    /// Delete the category only if it owns no issues. `false` when the row
    /// is missing or not empty.
    async fn delete_empty_category(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait IssueStore: Send + Sync {
    async fn list_issues(&self, query: &IssueListQuery) -> Result<Vec<Issue>, sqlx::Error>;
    async fn count_issues(&self, category_id: Option<DbId>) -> Result<i64, sqlx::Error>;
    async fn find_issue(&self, id: DbId) -> Result<Option<Issue>, sqlx::Error>;
    async fn create_issue(
        &self,
        input: &CheckedIssue,
        author_id: Option<DbId>,
    ) -> Result<Issue, sqlx::Error>;
    async fn update_issue(
        &self,
        id: DbId,
        input: &CheckedIssue,
    ) -> Result<Option<Issue>, sqlx::Error>;
    async fn delete_issue(&self, id: DbId) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait AdminUserStore: Send + Sync {
    async fn find_admin_user(&self, id: DbId) -> Result<Option<AdminUser>, sqlx::Error>;
    async fn find_admin_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error>;
    async fn create_admin_user(&self, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error>;
    async fn update_admin_profile(
        &self,
        id: DbId,
        input: &CheckedProfile,
    ) -> Result<Option<AdminUser>, sqlx::Error>;
    async fn update_admin_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error>;
}

/// Everything the application needs from a backend.
#[async_trait]
pub trait Store: CategoryStore + IssueStore + AdminUserStore {
    /// Confirm the backend is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// Postgres backend delegating to the repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        CategoryRepo::list(&self.pool).await
    }

    async fn category_choices(&self) -> Result<Vec<CategoryChoice>, sqlx::Error> {
        CategoryRepo::list_choices(&self.pool).await
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        CategoryRepo::find_by_id(&self.pool, id).await
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, sqlx::Error> {
        CategoryRepo::find_by_name(&self.pool, name).await
    }

    async fn category_exists(&self, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::exists(&self.pool, id).await
    }

    async fn create_category(&self, input: &CheckedCategory) -> Result<Category, sqlx::Error> {
        CategoryRepo::create(&self.pool, input).await
    }

    async fn update_category(
        &self,
        id: DbId,
        input: &CheckedCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        CategoryRepo::update(&self.pool, id, input).await
    }

    async fn count_category_issues(&self, id: DbId) -> Result<i64, sqlx::Error> {
        CategoryRepo::count_issues(&self.pool, id).await
    }

    async fn delete_empty_category(&self, id: DbId) -> Result<bool, sqlx::Error> {
        CategoryRepo::delete_if_empty(&self.pool, id).await
    }
}

#[async_trait]
impl IssueStore for PgStore {
    async fn list_issues(&self, query: &IssueListQuery) -> Result<Vec<Issue>, sqlx::Error> {
        IssueRepo::list(&self.pool, query).await
    }

    async fn count_issues(&self, category_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        IssueRepo::count(&self.pool, category_id).await
    }

    async fn find_issue(&self, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        IssueRepo::find_by_id(&self.pool, id).await
    }

    async fn create_issue(
        &self,
        input: &CheckedIssue,
        author_id: Option<DbId>,
    ) -> Result<Issue, sqlx::Error> {
        IssueRepo::create(&self.pool, input, author_id).await
    }

    async fn update_issue(
        &self,
        id: DbId,
        input: &CheckedIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        IssueRepo::update(&self.pool, id, input).await
    }

    async fn delete_issue(&self, id: DbId) -> Result<bool, sqlx::Error> {
        IssueRepo::delete(&self.pool, id).await
    }
}

#[async_trait]
impl AdminUserStore for PgStore {
    async fn find_admin_user(&self, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        AdminUserRepo::find_by_id(&self.pool, id).await
    }

    async fn find_admin_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        AdminUserRepo::find_by_email(&self.pool, email).await
    }

    async fn create_admin_user(&self, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        AdminUserRepo::create(&self.pool, input).await
    }

    async fn update_admin_profile(
        &self,
        id: DbId,
        input: &CheckedProfile,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        AdminUserRepo::update_profile(&self.pool, id, input).await
    }

    async fn update_admin_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        AdminUserRepo::update_password(&self.pool, id, password_hash).await
    }
}
