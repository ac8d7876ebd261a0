//! Issue model.

use bugtracker_core::listing::SortKey;
use bugtracker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `issues` table joined with its category's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Issue {
    pub id: DbId,
    pub title: String,
    pub description: String,
    /// One of `open`, `in_progress`, `closed`.
    pub status: String,
    /// One of `low`, `medium`, `high`.
    pub priority: String,
    pub category_id: DbId,
    pub category_name: String,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Issue {
    /// The columns the listing can order by.
    pub fn sort_key(&self) -> SortKey<'_> {
        SortKey {
            id: self.id,
            title: &self.title,
            status: &self.status,
            priority: &self.priority,
            created_at: self.created_at,
            category_name: &self.category_name,
        }
    }
}

/// DTO for creating a new issue.
///
/// `status` and `priority` fall back to `open` / `medium` when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIssue {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<DbId>,
}

/// DTO for updating an issue. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category_id: Option<DbId>,
}
