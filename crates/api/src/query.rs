//! Query string parameters for the issue listing.
//!
//! Values arrive as raw strings and are parsed leniently: a page or category
//! that does not parse as an integer is treated as absent rather than
//! rejecting the request.

use bugtracker_core::listing::{IssueListQuery, IssueSort};
use bugtracker_core::types::DbId;
use serde::Deserialize;

/// `?page=&category=&sort=&order=` for `GET /` and `GET /issue`.
#[derive(Debug, Default, Deserialize)]
pub struct ListIssuesParams {
    pub page: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListIssuesParams {
    /// Requested page, defaulting to 1. Values below 1 are clamped later.
    pub fn page(&self) -> i64 {
        parse_int(self.page.as_deref()).unwrap_or(1)
    }

    /// Category filter. Zero, negative or unparseable means "no filter".
    pub fn category_id(&self) -> Option<DbId> {
        parse_int(self.category.as_deref()).filter(|id| *id > 0)
    }

    pub fn sort(&self) -> IssueSort {
        IssueSort::from_params(
            self.sort.as_deref().unwrap_or_default(),
            self.order.as_deref().unwrap_or_default(),
        )
    }

    /// Normalize into a storage query with the configured page size.
    pub fn to_query(&self, page_size: i64) -> IssueListQuery {
        IssueListQuery::new(self.category_id(), self.page(), page_size, self.sort())
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
