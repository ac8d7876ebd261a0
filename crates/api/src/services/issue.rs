//! Issue use cases: the paginated listing and issue CRUD.

use std::sync::Arc;

use bugtracker_core::issue::{priority_options, status_options, ChoiceOption};
use bugtracker_core::listing::{total_pages, IssueListQuery};
use bugtracker_core::policy::{Action, Actor, IssuePolicy, IssueSubject};
use bugtracker_core::types::DbId;
use bugtracker_core::validation::{check_issue, IssueDraft};
use bugtracker_db::models::issue::{CreateIssue, Issue, UpdateIssue};
use bugtracker_db::Store;
use serde::Serialize;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// One page of the issue listing with its paging metadata.
#[derive(Debug, Serialize)]
pub struct IssuePage {
    pub items: Vec<Issue>,
    /// Issues matching the filter across all pages.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Select-box choices for the issue form.
#[derive(Debug, Serialize)]
pub struct IssueOptions {
    pub statuses: Vec<ChoiceOption>,
    pub priorities: Vec<ChoiceOption>,
}

pub struct IssueService {
    store: Arc<dyn Store>,
    policy: IssuePolicy,
}

impl IssueService {
    pub fn new(store: Arc<dyn Store>, policy: IssuePolicy) -> Self {
        Self { store, policy }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &ServerConfig) -> Self {
        Self::new(store, IssuePolicy::new(config.issue_edit_admin_only))
    }

    /// A page of issues plus the filtered total.
    ///
    /// A page past the end, or a category that does not exist, yields an
    /// empty page rather than an error.
    pub async fn list_issues(&self, query: &IssueListQuery) -> AppResult<IssuePage> {
        let items = self.store.list_issues(query).await?;
        let total = self.store.count_issues(query.category_id).await?;
        Ok(IssuePage {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
            total_pages: total_pages(total, query.page_size),
        })
    }

    pub async fn count_issues(&self, category_id: Option<DbId>) -> AppResult<i64> {
        Ok(self.store.count_issues(category_id).await?)
    }

    pub fn issue_options(&self) -> IssueOptions {
        IssueOptions {
            statuses: status_options(),
            priorities: priority_options(),
        }
    }

    pub async fn find_issue(&self, actor: Option<&Actor>, id: DbId) -> AppResult<Issue> {
        let issue = self.load(id).await?;
        self.policy
            .authorize(actor, Action::View, Some(&subject(&issue)))?;
        Ok(issue)
    }

    /// Create an issue authored by `actor`.
    pub async fn create_issue(
        &self,
        actor: Option<&Actor>,
        input: &CreateIssue,
    ) -> AppResult<Issue> {
        self.policy.authorize(actor, Action::Create, None)?;

        let draft = IssueDraft {
            title: &input.title,
            description: &input.description,
            status: input.status.as_deref(),
            priority: input.priority.as_deref(),
            category_id: input.category_id,
        };
        let category_exists = self.category_exists(input.category_id).await?;
        let checked = check_issue(&draft, category_exists)?;

        let author_id = actor.map(|a| a.user_id);
        let issue = self.store.create_issue(&checked, author_id).await?;

        tracing::info!(
            issue_id = issue.id,
            category_id = issue.category_id,
            user_id = author_id,
            "Issue created",
        );
        Ok(issue)
    }

    /// Apply a partial update. Omitted fields keep their stored value.
    pub async fn update_issue(
        &self,
        actor: Option<&Actor>,
        id: DbId,
        input: &UpdateIssue,
    ) -> AppResult<Issue> {
        let existing = self.load(id).await?;
        self.policy
            .authorize(actor, Action::Edit, Some(&subject(&existing)))?;

        let category_id = input.category_id.or(Some(existing.category_id));
        let draft = IssueDraft {
            title: input.title.as_deref().unwrap_or(&existing.title),
            description: input
                .description
                .as_deref()
                .unwrap_or(&existing.description),
            status: Some(input.status.as_deref().unwrap_or(&existing.status)),
            priority: Some(input.priority.as_deref().unwrap_or(&existing.priority)),
            category_id,
        };
        let category_exists = self.category_exists(category_id).await?;
        let checked = check_issue(&draft, category_exists)?;

        let issue = self
            .store
            .update_issue(id, &checked)
            .await?
            .ok_or_else(|| AppError::not_found("Issue", id))?;

        tracing::info!(
            issue_id = id,
            user_id = actor.map(|a| a.user_id),
            "Issue updated",
        );
        Ok(issue)
    }

    pub async fn delete_issue(&self, actor: Option<&Actor>, id: DbId) -> AppResult<()> {
        let existing = self.load(id).await?;
        self.policy
            .authorize(actor, Action::Delete, Some(&subject(&existing)))?;

        if !self.store.delete_issue(id).await? {
            return Err(AppError::not_found("Issue", id));
        }

        tracing::info!(
            issue_id = id,
            user_id = actor.map(|a| a.user_id),
            "Issue deleted",
        );
        Ok(())
    }

    async fn load(&self, id: DbId) -> AppResult<Issue> {
        self.store
            .find_issue(id)
            .await?
            .ok_or_else(|| AppError::not_found("Issue", id))
    }

    async fn category_exists(&self, category_id: Option<DbId>) -> AppResult<bool> {
        match category_id {
            Some(id) => Ok(self.store.category_exists(id).await?),
            None => Ok(false),
        }
    }
}

fn subject(issue: &Issue) -> IssueSubject {
    IssueSubject {
        author_id: issue.author_id,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bugtracker_core::error::CoreError;
    use bugtracker_core::listing::IssueSort;
    use bugtracker_core::validation::{CheckedCategory, MSG_CATEGORY_NOT_FOUND};
    use bugtracker_db::{CategoryStore, IssueStore, MemoryStore};

    use super::*;

    fn admin() -> Actor {
        Actor::new(1, &["admin"])
    }

    fn plain_user(id: DbId) -> Actor {
        Actor::new::<&str>(id, &[])
    }

    async fn setup(require_admin_only: bool) -> (IssueService, Arc<MemoryStore>, DbId) {
        let store = Arc::new(MemoryStore::new());
        let category = store
            .create_category(&CheckedCategory {
                name: "Bug".into(),
                description: None,
            })
            .await
            .unwrap();
        let service = IssueService::new(store.clone(), IssuePolicy::new(require_admin_only));
        (service, store, category.id)
    }

    fn create(title: &str, priority: &str, category_id: DbId) -> CreateIssue {
        CreateIssue {
            title: title.into(),
            description: "Enough detail to reproduce.".into(),
            status: None,
            priority: Some(priority.into()),
            category_id: Some(category_id),
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_author() {
        let (service, _, bug) = setup(true).await;
        let mut input = create("Login broken", "high", bug);
        input.priority = None;
        let issue = service.create_issue(Some(&admin()), &input).await.unwrap();
        assert_eq!(issue.status, "open");
        assert_eq!(issue.priority, "medium");
        assert_eq!(issue.author_id, Some(1));
        assert_eq!(issue.category_name, "Bug");
    }

    #[tokio::test]
    async fn create_requires_admin() {
        let (service, _, bug) = setup(false).await;
        let result = service
            .create_issue(Some(&plain_user(5)), &create("Login broken", "high", bug))
            .await;
        assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));
        assert_eq!(service.count_issues(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_category_is_a_field_violation() {
        let (service, _, _) = setup(true).await;
        let result = service
            .create_issue(Some(&admin()), &create("Login broken", "high", 404))
            .await;
        let Err(AppError::Core(CoreError::Validation(violations))) = result else {
            panic!("expected validation error");
        };
        assert_eq!(
            violations.messages_for("category_id").collect::<Vec<_>>(),
            [MSG_CATEGORY_NOT_FOUND]
        );
    }

    #[tokio::test]
    async fn author_edits_only_when_policy_allows() {
        let (strict, store, bug) = setup(true).await;
        let author = plain_user(9);
        let checked = check_issue(
            &IssueDraft {
                title: "Typo on login",
                description: "The button says Lgoin.",
                status: None,
                priority: None,
                category_id: Some(bug),
            },
            true,
        )
        .unwrap();
        let issue = store.create_issue(&checked, Some(author.user_id)).await.unwrap();

        let patch = UpdateIssue {
            status: Some("closed".into()),
            ..Default::default()
        };
        assert_matches!(
            strict.update_issue(Some(&author), issue.id, &patch).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );

        let lenient = IssueService::new(store.clone(), IssuePolicy::new(false));
        let updated = lenient
            .update_issue(Some(&author), issue.id, &patch)
            .await
            .unwrap();
        assert_eq!(updated.status, "closed");
        assert_eq!(updated.title, "Typo on login");
        assert_eq!(updated.created_at, issue.created_at);

        assert_matches!(
            lenient.delete_issue(Some(&plain_user(10)), issue.id).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        lenient.delete_issue(Some(&author), issue.id).await.unwrap();
    }

    #[tokio::test]
    async fn update_reports_invalid_status() {
        let (service, _, bug) = setup(true).await;
        let issue = service
            .create_issue(Some(&admin()), &create("Login broken", "high", bug))
            .await
            .unwrap();
        let patch = UpdateIssue {
            status: Some("resolved".into()),
            title: Some("ab".into()),
            ..Default::default()
        };
        let Err(AppError::Core(CoreError::Validation(violations))) =
            service.update_issue(Some(&admin()), issue.id, &patch).await
        else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 2);
    }

    #[tokio::test]
    async fn listing_pages_through_fifteen_issues() {
        let (service, _, bug) = setup(true).await;
        for n in 0..15 {
            service
                .create_issue(Some(&admin()), &create(&format!("Issue {n:02}"), "low", bug))
                .await
                .unwrap();
        }

        let sort = IssueSort::default();
        let first = service
            .list_issues(&IssueListQuery::new(None, 1, 10, sort))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 15);
        assert_eq!(first.total_pages, 2);
        // Newest first by default.
        assert_eq!(first.items[0].title, "Issue 14");

        let second = service
            .list_issues(&IssueListQuery::new(None, 2, 10, sort))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 5);

        let third = service
            .list_issues(&IssueListQuery::new(None, 3, 10, sort))
            .await
            .unwrap();
        assert!(third.items.is_empty());
        assert_eq!(third.total, 15);
    }

    #[tokio::test]
    async fn deleting_missing_issue_is_not_found() {
        let (service, _, _) = setup(true).await;
        assert_matches!(
            service.delete_issue(Some(&admin()), 3).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Issue", id: 3 }))
        );
    }
}
