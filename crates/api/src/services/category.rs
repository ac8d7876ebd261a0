//! Category use cases.

use std::sync::Arc;

use bugtracker_core::error::CoreError;
use bugtracker_core::policy::{Action, Actor, CategoryPolicy, CategorySubject, DenyReason};
use bugtracker_core::types::DbId;
use bugtracker_core::validation::check_category;
use bugtracker_db::models::category::{Category, CategoryChoice, CreateCategory, UpdateCategory};
use bugtracker_db::Store;

use crate::error::{AppError, AppResult};

pub struct CategoryService {
    store: Arc<dyn Store>,
    policy: CategoryPolicy,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            policy: CategoryPolicy,
        }
    }

    /// All categories ordered by name.
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    /// `(id, name)` pairs for issue forms, ordered by name.
    pub async fn category_choices(&self) -> AppResult<Vec<CategoryChoice>> {
        Ok(self.store.category_choices().await?)
    }

    pub async fn find_category(&self, actor: Option<&Actor>, id: DbId) -> AppResult<Category> {
        let category = self.load(id).await?;
        let issue_count = self.store.count_category_issues(id).await?;
        self.policy
            .authorize(actor, Action::View, Some(&subject(&category, issue_count)))?;
        Ok(category)
    }

    pub async fn create_category(
        &self,
        actor: Option<&Actor>,
        input: &CreateCategory,
    ) -> AppResult<Category> {
        self.policy.authorize(actor, Action::Create, None)?;
        let checked = check_category(&input.name, input.description.as_deref())?;
        let category = self.store.create_category(&checked).await?;

        tracing::info!(
            category_id = category.id,
            user_id = actor.map(|a| a.user_id),
            "Category created",
        );
        Ok(category)
    }

    /// Apply a partial update. Omitted fields keep their stored value and the
    /// merged result is validated as a whole.
    pub async fn update_category(
        &self,
        actor: Option<&Actor>,
        id: DbId,
        input: &UpdateCategory,
    ) -> AppResult<Category> {
        let existing = self.load(id).await?;
        let issue_count = self.store.count_category_issues(id).await?;
        self.policy
            .authorize(actor, Action::Edit, Some(&subject(&existing, issue_count)))?;

        let name = input.name.as_deref().unwrap_or(&existing.name);
        let description = match &input.description {
            Some(description) => Some(description.as_str()),
            None => existing.description.as_deref(),
        };
        let checked = check_category(name, description)?;

        let category = self
            .store
            .update_category(id, &checked)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))?;

        tracing::info!(
            category_id = id,
            user_id = actor.map(|a| a.user_id),
            "Category updated",
        );
        Ok(category)
    }

    /// Delete a category that owns no issues.
    ///
    /// Fails with an integrity error naming the category and its issue count
    /// otherwise, including when an issue is attached between the check and
    /// the delete.
    pub async fn delete_category(&self, actor: Option<&Actor>, id: DbId) -> AppResult<()> {
        let category = self.load(id).await?;
        let issue_count = self.store.count_category_issues(id).await?;
        self.policy
            .authorize(actor, Action::Delete, Some(&subject(&category, issue_count)))?;

        if !self.store.delete_empty_category(id).await? {
            let issue_count = self.store.count_category_issues(id).await?;
            if issue_count > 0 {
                let reason = DenyReason::HasAssociatedIssues {
                    name: category.name,
                    count: issue_count,
                };
                return Err(CoreError::Integrity(reason.to_string()).into());
            }
            return Err(AppError::not_found("Category", id));
        }

        tracing::info!(
            category_id = id,
            user_id = actor.map(|a| a.user_id),
            "Category deleted",
        );
        Ok(())
    }

    async fn load(&self, id: DbId) -> AppResult<Category> {
        self.store
            .find_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category", id))
    }
}

fn subject(category: &Category, issue_count: i64) -> CategorySubject<'_> {
    CategorySubject {
        name: &category.name,
        issue_count,
    }
}
