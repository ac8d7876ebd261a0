//! In-memory storage backend.
//!
//! Rows live in `BTreeMap`s behind an `Arc<tokio::sync::Mutex<_>>`; every
//! trait method takes the lock once, so each call is atomic just like a
//! single SQL statement. Listing goes through
//! [`IssueSort::compare`](bugtracker_core::listing::IssueSort::compare), which
//! mirrors the `ORDER BY` built by [`IssueRepo`](crate::repositories::IssueRepo).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bugtracker_core::listing::IssueListQuery;
use bugtracker_core::types::{DbId, Timestamp};
use bugtracker_core::validation::{CheckedCategory, CheckedIssue, CheckedProfile};
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::models::admin_user::{AdminUser, CreateAdminUser};
use crate::models::category::{Category, CategoryChoice};
use crate::models::issue::Issue;
use crate::store::{AdminUserStore, CategoryStore, IssueStore, Store};

/// A write the schema constraints would reject.
fn constraint_violation(message: String) -> sqlx::Error {
    sqlx::Error::Protocol(message)
}

#[derive(Debug, Default)]
struct Inner {
    categories: BTreeMap<DbId, Category>,
    /// `category_name` is refreshed from `categories` on every read.
    issues: BTreeMap<DbId, Issue>,
    admin_users: BTreeMap<DbId, AdminUser>,
    last_category_id: DbId,
    last_issue_id: DbId,
    last_admin_user_id: DbId,
    last_timestamp: Option<Timestamp>,
}

impl Inner {
    /// Current time, nudged forward so consecutive writes never share a
    /// timestamp.
    fn now(&mut self) -> Timestamp {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    fn category_name(&self, id: DbId) -> Option<&str> {
        self.categories.get(&id).map(|c| c.name.as_str())
    }

    fn with_category_name(&self, issue: &Issue) -> Issue {
        let mut issue = issue.clone();
        if let Some(name) = self.category_name(issue.category_id) {
            issue.category_name = name.to_string();
        }
        issue
    }

    fn issue_count(&self, category_id: DbId) -> i64 {
        self.issues
            .values()
            .filter(|i| i.category_id == category_id)
            .count() as i64
    }

    fn sorted_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        categories
    }
}

/// Thread-safe in-memory [`Store`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        Ok(self.inner.lock().await.sorted_categories())
    }

    async fn category_choices(&self) -> Result<Vec<CategoryChoice>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner
            .sorted_categories()
            .iter()
            .map(CategoryChoice::from)
            .collect())
    }

    async fn find_category(&self, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        Ok(self.inner.lock().await.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.categories.values().find(|c| c.name == name).cloned())
    }

    async fn category_exists(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.inner.lock().await.categories.contains_key(&id))
    }

    async fn create_category(&self, input: &CheckedCategory) -> Result<Category, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        inner.last_category_id += 1;
        let now = inner.now();
        let category = Category {
            id: inner.last_category_id,
            name: input.name.clone(),
            description: input.description.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: DbId,
        input: &CheckedCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        let now = inner.now();
        let Some(category) = inner.categories.get_mut(&id) else {
            return Ok(None);
        };
        category.name = input.name.clone();
        category.description = input.description.clone();
        category.updated_at = now;
        Ok(Some(category.clone()))
    }

    async fn count_category_issues(&self, id: DbId) -> Result<i64, sqlx::Error> {
        Ok(self.inner.lock().await.issue_count(id))
    }

    async fn delete_empty_category(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        if inner.issue_count(id) > 0 {
            return Ok(false);
        }
        Ok(inner.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl IssueStore for MemoryStore {
    async fn list_issues(&self, query: &IssueListQuery) -> Result<Vec<Issue>, sqlx::Error> {
        let inner = self.inner.lock().await;
        let mut issues: Vec<Issue> = inner
            .issues
            .values()
            .filter(|i| query.category_id.map_or(true, |id| i.category_id == id))
            .map(|i| inner.with_category_name(i))
            .collect();
        issues.sort_by(|a, b| query.sort.compare(&a.sort_key(), &b.sort_key()));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(0);
        Ok(issues.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_issues(&self, category_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(match category_id {
            Some(id) => inner.issue_count(id),
            None => inner.issues.len() as i64,
        })
    }

    async fn find_issue(&self, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.issues.get(&id).map(|i| inner.with_category_name(i)))
    }

    async fn create_issue(
        &self,
        input: &CheckedIssue,
        author_id: Option<DbId>,
    ) -> Result<Issue, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        let Some(category_name) = inner.category_name(input.category_id).map(str::to_string)
        else {
            return Err(constraint_violation(format!(
                "issues.category_id references missing category {}",
                input.category_id
            )));
        };
        inner.last_issue_id += 1;
        let now = inner.now();
        let issue = Issue {
            id: inner.last_issue_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status.as_str().to_string(),
            priority: input.priority.as_str().to_string(),
            category_id: input.category_id,
            category_name,
            author_id,
            created_at: now,
            updated_at: now,
        };
        inner.issues.insert(issue.id, issue.clone());
        Ok(issue)
    }

    async fn update_issue(
        &self,
        id: DbId,
        input: &CheckedIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        if !inner.issues.contains_key(&id) {
            return Ok(None);
        }
        let Some(category_name) = inner.category_name(input.category_id).map(str::to_string)
        else {
            return Err(constraint_violation(format!(
                "issues.category_id references missing category {}",
                input.category_id
            )));
        };
        let now = inner.now();
        let Some(issue) = inner.issues.get_mut(&id) else {
            return Ok(None);
        };
        issue.title = input.title.clone();
        issue.description = input.description.clone();
        issue.status = input.status.as_str().to_string();
        issue.priority = input.priority.as_str().to_string();
        issue.category_id = input.category_id;
        issue.category_name = category_name;
        issue.updated_at = now;
        Ok(Some(issue.clone()))
    }

    async fn delete_issue(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.inner.lock().await.issues.remove(&id).is_some())
    }
}

#[async_trait]
impl AdminUserStore for MemoryStore {
    async fn find_admin_user(&self, id: DbId) -> Result<Option<AdminUser>, sqlx::Error> {
        Ok(self.inner.lock().await.admin_users.get(&id).cloned())
    }

    async fn find_admin_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let inner = self.inner.lock().await;
        Ok(inner
            .admin_users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_admin_user(&self, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        if inner.admin_users.values().any(|u| u.email == input.email) {
            return Err(constraint_violation(format!(
                "uq_admin_users_email: {} already exists",
                input.email
            )));
        }
        inner.last_admin_user_id += 1;
        let now = inner.now();
        let user = AdminUser {
            id: inner.last_admin_user_id,
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            roles: input.roles.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.admin_users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_admin_profile(
        &self,
        id: DbId,
        input: &CheckedProfile,
    ) -> Result<Option<AdminUser>, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        let now = inner.now();
        let Some(user) = inner.admin_users.get_mut(&id) else {
            return Ok(None);
        };
        user.first_name = input.first_name.clone();
        user.last_name = input.last_name.clone();
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn update_admin_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().await;
        let now = inner.now();
        let Some(user) = inner.admin_users.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        user.updated_at = now;
        Ok(true)
    }
}
