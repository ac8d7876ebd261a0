//! Filter, sort and pagination parameters for the issue listing.
//!
//! Sort parameters arrive as free-form query strings. They are mapped onto
//! the closed [`SortField`] / [`SortDirection`] enums here, so storage
//! backends only ever see allow-listed values and never interpolate caller
//! input into a query.

use std::cmp::Ordering;

use serde::Serialize;

use crate::issue::priority_rank;
use crate::types::{DbId, Timestamp};

/// Issues per page when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound applied to caller-supplied page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sort field / direction
// ---------------------------------------------------------------------------

/// Column an issue listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "priority")]
    Priority,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    /// Orders by the owning category's name, not its id.
    #[serde(rename = "category")]
    Category,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        Self::Title,
        Self::Status,
        Self::Priority,
        Self::CreatedAt,
        Self::Category,
    ];

    /// Parse a sort parameter. Anything outside the allow-list falls back to
    /// [`SortField::CreatedAt`]. Matching is case-sensitive.
    pub fn from_param(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|field| field.as_param() == raw)
            .unwrap_or_default()
    }

    pub fn as_param(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::CreatedAt => "createdAt",
            Self::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"ASC"` in any letter case is ascending; every other value is descending.
    pub fn from_param(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("ASC") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A validated `(field, direction)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IssueSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl IssueSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Normalize raw `sort` / `order` query parameters.
    pub fn from_params(field: &str, direction: &str) -> Self {
        Self::new(
            SortField::from_param(field),
            SortDirection::from_param(direction),
        )
    }

    /// Direction applied to the priority rank.
    ///
    /// Rank 1 is `high`, so "DESC priority" (most severe first) orders the
    /// rank ascending, and "ASC priority" orders it descending.
    pub fn priority_rank_direction(&self) -> SortDirection {
        self.direction.reversed()
    }

    /// Total order used by in-process backends. Must agree with the SQL
    /// `ORDER BY` built by the Postgres repository, including the final
    /// tie-break on ascending id. Text compares by code point, which the
    /// repository matches with `COLLATE "C"`.
    pub fn compare(&self, a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
        let primary = match self.field {
            SortField::Title => self.direction.apply(a.title.cmp(b.title)),
            SortField::Status => self.direction.apply(a.status.cmp(b.status)),
            SortField::CreatedAt => self.direction.apply(a.created_at.cmp(&b.created_at)),
            SortField::Category => self.direction.apply(a.category_name.cmp(b.category_name)),
            SortField::Priority => self
                .priority_rank_direction()
                .apply(priority_rank(a.priority).cmp(&priority_rank(b.priority))),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// The issue columns a listing can be ordered by.
#[derive(Debug, Clone, Copy)]
pub struct SortKey<'a> {
    pub id: DbId,
    pub title: &'a str,
    pub status: &'a str,
    pub priority: &'a str,
    pub created_at: Timestamp,
    pub category_name: &'a str,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One page request against the issue listing.
///
/// Backends trust these values as given: page and page size are expected to
/// be clamped already, which [`IssueListQuery::new`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueListQuery {
    pub category_id: Option<DbId>,
    pub page: i64,
    pub page_size: i64,
    pub sort: IssueSort,
}

impl IssueListQuery {
    /// Build a query from caller input, clamping `page` to at least 1 and
    /// `page_size` into `1..=MAX_PAGE_SIZE`.
    pub fn new(category_id: Option<DbId>, page: i64, page_size: i64, sort: IssueSort) -> Self {
        Self {
            category_id,
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            sort,
        }
    }

    /// Rows to skip. Saturates, so an absurd page lands past the end.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for IssueListQuery {
    fn default() -> Self {
        Self::new(None, 1, DEFAULT_PAGE_SIZE, IssueSort::default())
    }
}

/// Number of pages needed for `total` rows, `ceil(total / page_size)`.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}
